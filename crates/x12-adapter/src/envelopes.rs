//! X12 envelope handling (ISA/IEA, GS/GE, ST/SE, TA1)
//!
//! This module assembles envelope header and trailer segments. Assembly is
//! pure: callers decide when and where the segments are written.

use crate::segment::OutputSegment;
use crate::syntax::Terminators;

/// ISA01/ISA03 qualifier for "no authorization/security information"
pub const NO_AUTH_QUALIFIER: &str = "00";
/// ISA02/ISA04 filler when no authorization/security information is present
pub const NO_AUTH_INFO: &str = "          ";
/// Width of ISA06/ISA08
pub const ISA_ID_WIDTH: usize = 15;

/// ISA - Interchange Control Header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsaSegment {
    /// ISA05 sender ID qualifier
    pub sender_qualifier: String,
    /// ISA06 sender ID
    pub sender_id: String,
    /// ISA07 receiver ID qualifier
    pub receiver_qualifier: String,
    /// ISA08 receiver ID
    pub receiver_id: String,
    /// ISA09 date (YYMMDD)
    pub date: String,
    /// ISA10 time (HHMM)
    pub time: String,
    /// ISA12 control version number
    pub version: String,
    /// ISA13 interchange control number
    pub control_number: String,
    /// ISA14 acknowledgment requested
    pub ack_requested: String,
    /// ISA15 usage indicator
    pub usage_indicator: String,
}

/// GS - Functional Group Header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GsSegment {
    /// GS01 functional identifier code
    pub functional_id: String,
    /// GS02 application sender's code
    pub sender: String,
    /// GS03 application receiver's code
    pub receiver: String,
    /// GS04 date (CCYYMMDD)
    pub date: String,
    /// GS05 time (HHMMSS)
    pub time: String,
    /// GS06 group control number
    pub control_number: String,
    /// GS07 responsible agency code
    pub agency: String,
    /// GS08 version/release/industry identifier code
    pub version: String,
}

/// TA1 - Interchange Acknowledgment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ta1Segment {
    /// TA101 interchange control number being acknowledged
    pub control_number: String,
    /// TA102 interchange date
    pub date: String,
    /// TA103 interchange time
    pub time: String,
    /// TA104 acknowledgment code (A/E/R)
    pub ack_code: String,
    /// TA105 interchange note code
    pub note_code: String,
}

/// Generate an ISA segment
///
/// ISA06 and ISA08 are padded to their fixed width; ISA11 and ISA16 carry
/// the repetition and component separators.
pub fn generate_isa(isa: &IsaSegment, terminators: &Terminators) -> OutputSegment {
    let mut seg = OutputSegment::new("ISA");
    seg.push(NO_AUTH_QUALIFIER)
        .push(NO_AUTH_INFO)
        .push(NO_AUTH_QUALIFIER)
        .push(NO_AUTH_INFO)
        .push(isa.sender_qualifier.as_str())
        .push(pad_id(&isa.sender_id))
        .push(isa.receiver_qualifier.as_str())
        .push(pad_id(&isa.receiver_id))
        .push(isa.date.as_str())
        .push(isa.time.as_str())
        .push(terminators.repetition.to_string())
        .push(isa.version.as_str())
        .push(isa.control_number.as_str())
        .push(isa.ack_requested.as_str())
        .push(isa.usage_indicator.as_str())
        .push(terminators.subelement.to_string());
    seg
}

/// Generate an IEA segment
pub fn generate_iea(group_count: usize, control_number: &str) -> OutputSegment {
    trailer("IEA", group_count, control_number)
}

/// Generate a GS segment
pub fn generate_gs(gs: &GsSegment) -> OutputSegment {
    let mut seg = OutputSegment::new("GS");
    seg.push(gs.functional_id.as_str())
        .push(gs.sender.as_str())
        .push(gs.receiver.as_str())
        .push(gs.date.as_str())
        .push(gs.time.as_str())
        .push(gs.control_number.as_str())
        .push(gs.agency.as_str())
        .push(gs.version.as_str());
    seg
}

/// Generate a GE segment
pub fn generate_ge(transaction_count: usize, control_number: &str) -> OutputSegment {
    trailer("GE", transaction_count, control_number)
}

/// Generate an ST segment
pub fn generate_st(set_id: &str, control_number: &str) -> OutputSegment {
    let mut seg = OutputSegment::new("ST");
    seg.push(set_id).push(control_number);
    seg
}

/// Generate an SE segment
///
/// `segment_count` includes the ST and SE segments themselves.
pub fn generate_se(segment_count: usize, control_number: &str) -> OutputSegment {
    trailer("SE", segment_count, control_number)
}

/// Generate a TA1 segment
pub fn generate_ta1(ta1: &Ta1Segment) -> OutputSegment {
    let mut seg = OutputSegment::new("TA1");
    seg.push(ta1.control_number.as_str())
        .push(ta1.date.as_str())
        .push(ta1.time.as_str())
        .push(ta1.ack_code.as_str())
        .push(ta1.note_code.as_str());
    seg
}

fn trailer(id: &str, count: usize, control_number: &str) -> OutputSegment {
    let mut seg = OutputSegment::new(id);
    seg.push(count.to_string()).push(control_number);
    seg
}

fn pad_id(id: &str) -> String {
    format!("{id:<width$}", width = ISA_ID_WIDTH)
}

// ============================================================================
// Tests
// ============================================================================
