//! Result nodes for the validation tree
//!
//! One node type per envelope level. The upstream validator builds the tree
//! once; acknowledgment generation only reads it.

use crate::metadata::{AckCode, ErrorRecord};
use serde::{Deserialize, Serialize};

/// ISA values as received in the acknowledged interchange
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsaHeader {
    /// ISA05 interchange ID qualifier (sender)
    pub sender_qualifier: String,

    /// ISA06 interchange sender ID
    pub sender_id: String,

    /// ISA07 interchange ID qualifier (receiver)
    pub receiver_qualifier: String,

    /// ISA08 interchange receiver ID
    pub receiver_id: String,

    /// ISA09 interchange date (YYMMDD)
    pub date: String,

    /// ISA10 interchange time (HHMM)
    pub time: String,

    /// ISA12 interchange control version number
    pub version: String,

    /// ISA13 interchange control number
    pub control_number: String,

    /// ISA14 acknowledgment requested
    pub ack_requested: String,

    /// ISA15 usage indicator (P/T)
    pub usage_indicator: String,
}

/// GS values as received in the acknowledged functional group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GsHeader {
    /// GS01 functional identifier code
    pub functional_id: String,

    /// GS02 application sender's code
    pub sender: String,

    /// GS03 application receiver's code
    pub receiver: String,

    /// GS06 group control number
    pub control_number: String,

    /// GS07 responsible agency code
    pub agency: String,
}

/// Root of the validation tree: one received interchange
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterchangeResult {
    /// ISA context of the received interchange
    pub isa: IsaHeader,

    /// TA1 request flag ("1" requests an interchange acknowledgment)
    pub ta1_req: Option<String>,

    /// Interchange-level findings
    pub errors: Vec<ErrorRecord>,

    /// ISA/IEA element findings
    pub elements: Vec<ElementResult>,

    /// Functional groups in receipt order
    pub groups: Vec<GroupResult>,
}

/// One received functional group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupResult {
    /// GS context of the received group
    pub gs: GsHeader,

    /// Group acknowledgment code (AK9-01)
    pub ack_code: Option<AckCode>,

    /// Transaction set count from GE01
    pub st_count_orig: Option<u32>,

    /// Transaction sets actually received
    pub st_count_recv: Option<u32>,

    /// Group-level findings
    pub errors: Vec<ErrorRecord>,

    /// GS/GE element findings
    pub elements: Vec<ElementResult>,

    /// Transaction sets in receipt order
    pub transactions: Vec<TransactionResult>,
}

/// One received transaction set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionResult {
    /// ST01 transaction set identifier code
    pub trn_set_id: String,

    /// ST02 transaction set control number, as received
    pub trn_set_control_num: String,

    /// Transaction set acknowledgment code (AK5-01), required
    pub ack_code: Option<AckCode>,

    /// Transaction-level findings
    pub errors: Vec<ErrorRecord>,

    /// ST/SE element findings
    pub elements: Vec<ElementResult>,

    /// Segments with findings, in receipt order
    pub segments: Vec<SegmentResult>,
}

/// One data segment occurrence with findings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentResult {
    /// Segment identifier (e.g. "NM1")
    pub seg_id: String,

    /// Position of the segment in the transaction set (ST = 1)
    pub seg_count: u32,

    /// Loop identifier the segment sits in
    pub ls_id: Option<String>,

    /// Segment-level findings
    pub errors: Vec<ErrorRecord>,

    /// Element findings
    pub elements: Vec<ElementResult>,
}

/// One data element with findings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementResult {
    /// Element position in the segment (1-based)
    pub ele_pos: u32,

    /// Component position within a composite (1-based)
    pub subele_pos: Option<u32>,

    /// Data element reference number
    pub ele_ref_num: Option<String>,

    /// Element-level findings
    pub errors: Vec<ErrorRecord>,
}

impl InterchangeResult {
    /// Create an interchange result for the given ISA context
    pub fn new(isa: IsaHeader) -> Self {
        Self {
            isa,
            ..Self::default()
        }
    }

    /// Whether the sender asked for a TA1
    pub fn ta1_requested(&self) -> bool {
        self.ta1_req.as_deref() == Some("1")
    }
}

impl GroupResult {
    /// Create a group result for the given GS context
    pub fn new(gs: GsHeader) -> Self {
        Self {
            gs,
            ..Self::default()
        }
    }

    /// Number of transaction sets not accepted (unset counts as failed)
    pub fn count_failed_st(&self) -> u32 {
        let failed = self
            .transactions
            .iter()
            .filter(|st| !st.ack_code.is_some_and(AckCode::is_accepted))
            .count();
        u32::try_from(failed).unwrap_or(u32::MAX)
    }
}

impl TransactionResult {
    /// Create a transaction result
    pub fn new(trn_set_id: impl Into<String>, trn_set_control_num: impl Into<String>) -> Self {
        Self {
            trn_set_id: trn_set_id.into(),
            trn_set_control_num: trn_set_control_num.into(),
            ..Self::default()
        }
    }

    /// Total findings on child segments and their elements
    pub fn child_err_count(&self) -> usize {
        self.segments
            .iter()
            .map(|seg| seg.errors.len() + seg.child_err_count())
            .sum()
    }
}

impl SegmentResult {
    /// Create a segment result
    pub fn new(seg_id: impl Into<String>, seg_count: u32) -> Self {
        Self {
            seg_id: seg_id.into(),
            seg_count,
            ..Self::default()
        }
    }

    /// Total findings on child elements
    pub fn child_err_count(&self) -> usize {
        self.elements.iter().map(|ele| ele.errors.len()).sum()
    }
}

impl ElementResult {
    /// Create an element result at the given position
    pub fn new(ele_pos: u32) -> Self {
        Self {
            ele_pos,
            ..Self::default()
        }
    }

    /// Add a finding
    pub fn add_error(&mut self, error: ErrorRecord) -> &mut Self {
        self.errors.push(error);
        self
    }
}
