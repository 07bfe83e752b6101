//! 999 acknowledgment generator
//!
//! `AckGenerator` implements [`Traversal`] over the validation tree and
//! writes the acknowledgment while the tree is walked:
//!
//! ```text
//! ISA, GS,
//! { ST, AK1, { AK2, { IK3, {IK4}* }*, AK5 }*, AK9, SE }*,
//! GE, TA1 (when requested), IEA
//! ```
//!
//! One 999 transaction set is written per received functional group.

use std::io::Write;

use tracing::{Span, debug, info, info_span, warn};
use x12_adapter::envelopes::{
    GsSegment, IsaSegment, Ta1Segment, generate_ge, generate_gs, generate_iea, generate_isa,
    generate_se, generate_st, generate_ta1,
};
use x12_adapter::{OutputSegment, SegmentWriter};
use x12_ir::{
    AckCode, ElementResult, GroupResult, InterchangeResult, ResultNode, SegmentResult,
    Traversal, TransactionResult, walk,
};

use crate::codes::{self, TA1_NO_ERROR};
use crate::config::AckConfig;
use crate::control::{Clock, ControlNumbers, LocalClock, gs_date, gs_time, isa_date, isa_time};
use crate::segments::{
    generate_ak1, generate_ak2, generate_ak5, generate_ak9, generate_ik3, generate_ik4,
    ik3_template, ik4_template,
};
use crate::{Error, Result};

/// Transaction set identifier of the acknowledgment
pub const ACK_TRANSACTION_SET_ID: &str = "999";
/// GS01 functional identifier code for functional acknowledgments
pub const ACK_FUNCTIONAL_ID: &str = "FA";
/// GS08 version of the acknowledgment
pub const ACK_VERSION: &str = "005010";

/// Writes a 999 for a validation tree
pub struct AckGenerator<W: Write, C: Clock = LocalClock> {
    writer: SegmentWriter<W>,
    clock: C,
    span: Span,
    control: ControlNumbers,
    /// GS06 echoed into GE02
    gs_control_number: String,
    /// Functional groups written in this interchange
    gs_loop_count: usize,
    /// 999 transaction sets written in the current group
    st_loop_count: usize,
    /// Segments written since ST, ST included
    seg_count: usize,
}

impl<W: Write> AckGenerator<W, LocalClock> {
    /// Create a generator stamping envelopes with the local time
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration is unusable.
    pub fn new(sink: W, config: &AckConfig) -> Result<Self> {
        Self::with_clock(sink, config, LocalClock)
    }
}

impl<W: Write, C: Clock> AckGenerator<W, C> {
    /// Create a generator with an explicit clock
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration is unusable.
    pub fn with_clock(sink: W, config: &AckConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            writer: SegmentWriter::new(sink, config.terminators.clone()),
            clock,
            span: info_span!("ack999"),
            control: ControlNumbers::new(),
            gs_control_number: String::new(),
            gs_loop_count: 0,
            st_loop_count: 0,
            seg_count: 0,
        })
    }

    /// Record all events of this generator under `span`
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Walk the tree and write the acknowledgment
    ///
    /// Output already written when an error occurs is incomplete and must
    /// be discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tree`] for a transaction set without an
    /// acknowledgment code or a malformed tree, and [`Error::Output`] when
    /// the sink fails.
    pub fn generate(&mut self, tree: &InterchangeResult) -> Result<()> {
        walk(tree, self)
    }

    /// Interchange control number of the generated ISA/IEA
    pub fn interchange_control_number(&self) -> &str {
        self.control.interchange()
    }

    /// Flush the sink and hand it back
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] when flushing fails.
    pub fn finish(self) -> Result<W> {
        Ok(self.writer.finish()?)
    }

    fn write_segment(&mut self, segment: &OutputSegment) -> Result<()> {
        self.writer.write(segment)?;
        self.seg_count += 1;
        debug!(segment = %segment.id, seg_count = self.seg_count, "Emitted segment");
        Ok(())
    }

    fn begin_interchange(&mut self, isa: &InterchangeResult) -> Result<()> {
        let gs = isa.groups.first().ok_or_else(|| {
            x12_ir::Error::malformed("interchange has no functional group to acknowledge")
        })?;

        let now = self.clock.now();
        let control_number = self.control.start_interchange(now).to_string();
        let isa_seg = IsaSegment {
            sender_qualifier: isa.isa.receiver_qualifier.clone(),
            sender_id: isa.isa.receiver_id.clone(),
            receiver_qualifier: isa.isa.sender_qualifier.clone(),
            receiver_id: isa.isa.sender_id.clone(),
            date: isa_date(now),
            time: isa_time(now),
            version: isa.isa.version.clone(),
            control_number,
            ack_requested: isa.isa.ack_requested.clone(),
            usage_indicator: isa.isa.usage_indicator.clone(),
        };
        let isa_out = generate_isa(&isa_seg, self.writer.terminators());
        self.write_segment(&isa_out)?;

        let now = self.clock.now();
        let gs_seg = GsSegment {
            functional_id: ACK_FUNCTIONAL_ID.to_string(),
            sender: gs.gs.receiver.trim_end().to_string(),
            receiver: gs.gs.sender.trim_end().to_string(),
            date: gs_date(now),
            time: gs_time(now),
            control_number: gs.gs.control_number.clone(),
            agency: gs.gs.agency.clone(),
            version: ACK_VERSION.to_string(),
        };
        self.write_segment(&generate_gs(&gs_seg))?;
        self.gs_control_number = gs_seg.control_number;
        self.gs_loop_count = 1;
        self.st_loop_count = 0;
        Ok(())
    }

    fn end_interchange(&mut self, isa: &InterchangeResult) -> Result<()> {
        let ge = generate_ge(self.st_loop_count, &self.gs_control_number);
        self.write_segment(&ge)?;

        if isa.ta1_requested() {
            let codes = codes::interchange_codes(isa)?;
            let (ack_code, note_code) = match codes.first() {
                Some(code) => ("R", code.as_str()),
                None => ("A", TA1_NO_ERROR),
            };
            let ta1 = Ta1Segment {
                control_number: isa.isa.control_number.clone(),
                date: isa.isa.date.clone(),
                time: isa.isa.time.clone(),
                ack_code: ack_code.to_string(),
                note_code: note_code.to_string(),
            };
            self.write_segment(&generate_ta1(&ta1))?;
        }

        let iea = generate_iea(self.gs_loop_count, self.control.interchange());
        self.write_segment(&iea)?;
        info!(
            control_number = self.control.interchange(),
            transaction_sets = self.st_loop_count,
            "Generated 999 acknowledgment"
        );
        Ok(())
    }

    fn begin_group(&mut self, gs: &GroupResult) -> Result<()> {
        let control_number = self.control.next_transaction();
        self.seg_count = 0;
        self.write_segment(&generate_st(ACK_TRANSACTION_SET_ID, &control_number))?;
        self.st_loop_count += 1;

        self.write_segment(&generate_ak1(&gs.gs))
    }

    fn end_group(&mut self, gs: &GroupResult) -> Result<()> {
        if gs.ack_code.is_none() || gs.st_count_orig.is_none() || gs.st_count_recv.is_none() {
            warn!(
                group = %gs.gs.control_number,
                ack_code = ?gs.ack_code,
                st_count_orig = ?gs.st_count_orig,
                st_count_recv = ?gs.st_count_recv,
                "Group acknowledgment fields not set, using defaults"
            );
        }
        let ack_code = gs.ack_code.unwrap_or(AckCode::Rejected);
        let st_count_orig = gs.st_count_orig.unwrap_or(0);
        let st_count_recv = gs.st_count_recv.unwrap_or(0);
        let accepted = st_count_recv.saturating_sub(gs.count_failed_st());

        let codes = codes::group_codes(gs)?;
        let ak9 = generate_ak9(ack_code, st_count_orig, st_count_recv, accepted, &codes);
        self.write_segment(&ak9)?;

        let se = generate_se(self.seg_count + 1, &self.control.transaction());
        self.write_segment(&se)
    }

    fn begin_transaction(&mut self, st: &TransactionResult) -> Result<()> {
        required_ack_code(st)?;
        self.write_segment(&generate_ak2(st))
    }

    fn end_transaction(&mut self, st: &TransactionResult) -> Result<()> {
        let ack_code = required_ack_code(st)?;
        let codes = codes::transaction_codes(st)?;
        self.write_segment(&generate_ak5(ack_code, &codes))
    }

    fn emit_segment(&mut self, seg: &SegmentResult) -> Result<()> {
        let template = ik3_template(seg);
        for code in codes::segment_codes(seg) {
            self.write_segment(&generate_ik3(&template, &code))?;
        }
        Ok(())
    }

    fn emit_element(&mut self, ele: &ElementResult) -> Result<()> {
        let template = ik4_template(ele);
        for (code, bad_value) in codes::element_codes(ele) {
            let bad_value = bad_value.filter(|value| {
                let clean = !value.chars().any(|c| self.writer.terminators().is_special(c));
                if !clean {
                    warn!(ele_pos = ele.ele_pos, "Bad value contains a terminator, omitted from IK4");
                }
                clean
            });
            self.write_segment(&generate_ik4(&template, code, bad_value))?;
        }
        Ok(())
    }
}

fn required_ack_code(st: &TransactionResult) -> Result<AckCode> {
    st.ack_code.ok_or_else(|| {
        Error::Tree(x12_ir::Error::missing_ack_code(
            st.trn_set_id.as_str(),
            st.trn_set_control_num.trim(),
        ))
    })
}

impl<W: Write, C: Clock> Traversal for AckGenerator<W, C> {
    type Error = Error;

    fn enter(&mut self, node: ResultNode<'_>) -> Result<()> {
        let span = self.span.clone();
        let _entered = span.enter();
        match node {
            ResultNode::Interchange(isa) => self.begin_interchange(isa),
            ResultNode::Group(gs) => self.begin_group(gs),
            ResultNode::Transaction(st) => self.begin_transaction(st),
            ResultNode::Segment(seg) => self.emit_segment(seg),
            ResultNode::Element(ele) => self.emit_element(ele),
        }
    }

    fn leave(&mut self, node: ResultNode<'_>) -> Result<()> {
        let span = self.span.clone();
        let _entered = span.enter();
        match node {
            ResultNode::Interchange(isa) => self.end_interchange(isa),
            ResultNode::Group(gs) => self.end_group(gs),
            ResultNode::Transaction(st) => self.end_transaction(st),
            ResultNode::Segment(_) | ResultNode::Element(_) => Ok(()),
        }
    }
}

impl<W: Write, C: Clock> std::fmt::Debug for AckGenerator<W, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AckGenerator")
            .field("interchange", &self.control.interchange())
            .field("gs_loop_count", &self.gs_loop_count)
            .field("st_loop_count", &self.st_loop_count)
            .field("seg_count", &self.seg_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::FixedClock;
    use chrono::NaiveDate;
    use std::io;
    use x12_ir::{ErrorRecord, GsHeader, IsaHeader};

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2003, 4, 25)
                .unwrap()
                .and_hms_opt(15, 1, 53)
                .unwrap(),
        )
    }

    fn tree(transactions: Vec<TransactionResult>) -> InterchangeResult {
        let isa = IsaHeader {
            sender_qualifier: "ZZ".to_string(),
            sender_id: "SUBMITTER".to_string(),
            receiver_qualifier: "ZZ".to_string(),
            receiver_id: "RECEIVER".to_string(),
            date: "030424".to_string(),
            time: "1200".to_string(),
            version: "00501".to_string(),
            control_number: "000000905".to_string(),
            ack_requested: "0".to_string(),
            usage_indicator: "T".to_string(),
        };
        let count = u32::try_from(transactions.len()).unwrap();
        let failed = transactions
            .iter()
            .filter(|st| st.ack_code != Some(AckCode::Accepted))
            .count();
        let gs = GroupResult {
            ack_code: Some(if failed == 0 {
                AckCode::Accepted
            } else {
                AckCode::PartiallyAccepted
            }),
            st_count_orig: Some(count),
            st_count_recv: Some(count),
            transactions,
            ..GroupResult::new(GsHeader {
                functional_id: "HC".to_string(),
                sender: "SUBMITTER".to_string(),
                receiver: "RECEIVER".to_string(),
                control_number: "17".to_string(),
                agency: "X".to_string(),
            })
        };
        InterchangeResult {
            groups: vec![gs],
            ..InterchangeResult::new(isa)
        }
    }

    fn accepted(control: &str) -> TransactionResult {
        TransactionResult {
            ack_code: Some(AckCode::Accepted),
            ..TransactionResult::new("837", control)
        }
    }

    fn render(tree: &InterchangeResult) -> Result<Vec<String>> {
        let mut generator = AckGenerator::with_clock(Vec::new(), &AckConfig::default(), clock())?;
        generator.generate(tree)?;
        let out = String::from_utf8(generator.finish()?).unwrap();
        Ok(out.lines().map(str::to_string).collect())
    }

    fn ids(lines: &[String]) -> Vec<&str> {
        lines
            .iter()
            .map(|l| l.split(['*', '~']).next().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_error_free_tree() {
        let lines = render(&tree(vec![accepted("0001")])).unwrap();
        assert_eq!(
            lines,
            vec![
                "ISA*00*          *00*          *ZZ*RECEIVER       *ZZ*SUBMITTER      \
                 *030425*1501*^*00501*304251501*0*T*:~",
                "GS*FA*RECEIVER*SUBMITTER*20030425*150153*17*X*005010~",
                "ST*999*0001~",
                "AK1*HC*17~",
                "AK2*837*0001~",
                "AK5*A~",
                "AK9*A*1*1*1~",
                "SE*6*0001~",
                "GE*1*17~",
                "IEA*1*304251501~",
            ]
        );
    }

    #[test]
    fn test_child_element_error_yields_single_ik3_eight() {
        let mut seg = SegmentResult::new("CLM", 3);
        let mut ele = ElementResult::new(5);
        ele.add_error(ErrorRecord::new("7", "Invalid code value").with_bad_value("ZZ"));
        seg.elements.push(ele);
        let st = TransactionResult {
            ack_code: Some(AckCode::Rejected),
            segments: vec![seg],
            ..TransactionResult::new("837", "0001")
        };

        let lines = render(&tree(vec![st])).unwrap();
        let ik3: Vec<&String> = lines.iter().filter(|l| l.starts_with("IK3")).collect();
        assert_eq!(ik3, vec!["IK3*CLM*3**8~"]);
        assert!(lines.contains(&"IK4*5**7*ZZ~".to_string()));
        assert!(lines.contains(&"AK5*R*5~".to_string()));
    }

    #[test]
    fn test_seg1_reported_as_eight() {
        let mut seg = SegmentResult::new("NM1", 4);
        seg.errors.push(ErrorRecord::new("SEG1", "Segment has element errors"));
        let st = TransactionResult {
            ack_code: Some(AckCode::Rejected),
            segments: vec![seg],
            ..TransactionResult::new("837", "0001")
        };

        let lines = render(&tree(vec![st])).unwrap();
        assert!(lines.contains(&"IK3*NM1*4**8~".to_string()));
        assert!(lines.iter().all(|l| !l.contains("SEG1")));
    }

    #[test]
    fn test_ak5_capped_at_five_codes() {
        let mut st = TransactionResult {
            ack_code: Some(AckCode::Rejected),
            ..TransactionResult::new("837", "0001")
        };
        for code in ["1", "2", "3", "4", "6", "7", "9"] {
            st.errors.push(ErrorRecord::new(code, ""));
        }

        let lines = render(&tree(vec![st])).unwrap();
        let ak5 = lines.iter().find(|l| l.starts_with("AK5")).unwrap();
        assert_eq!(ak5, "AK5*R*1*2*3*4*6~");
    }

    #[test]
    fn test_se_count_matches_segments_in_transaction() {
        let mut seg = SegmentResult::new("REF", 8);
        seg.errors.push(ErrorRecord::new("2", "Unexpected segment"));
        let mut ele = ElementResult::new(1);
        ele.add_error(ErrorRecord::new("1", "Missing"));
        ele.add_error(ErrorRecord::new("4", "Too short"));
        seg.elements.push(ele);
        let st = TransactionResult {
            ack_code: Some(AckCode::Rejected),
            segments: vec![seg],
            ..TransactionResult::new("837", "0002")
        };

        let lines = render(&tree(vec![accepted("0001"), st])).unwrap();
        let ids = ids(&lines);
        let st_pos = ids.iter().position(|id| *id == "ST").unwrap();
        let se_pos = ids.iter().position(|id| *id == "SE").unwrap();
        let expected = se_pos - st_pos + 1;

        let se = &lines[se_pos];
        assert_eq!(se, &format!("SE*{expected}*0001~"));
    }

    #[test]
    fn test_iea_echoes_isa_control_number() {
        let mut generator =
            AckGenerator::with_clock(Vec::new(), &AckConfig::default(), clock()).unwrap();
        generator.generate(&tree(vec![accepted("0001")])).unwrap();
        assert_eq!(generator.interchange_control_number(), "304251501");

        let out = String::from_utf8(generator.finish().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        let isa13 = lines[0].split('*').nth(13).unwrap();
        assert_eq!(isa13, "304251501");
        assert_eq!(*lines.last().unwrap(), "IEA*1*304251501~");
    }

    #[test]
    fn test_missing_transaction_ack_code_aborts_before_ak2() {
        let bad = TransactionResult::new("837", "0002");
        let input = tree(vec![accepted("0001"), bad]);

        let mut generator =
            AckGenerator::with_clock(Vec::new(), &AckConfig::default(), clock()).unwrap();
        let err = generator.generate(&input).unwrap_err();
        assert!(matches!(
            err,
            Error::Tree(x12_ir::Error::MissingAckCode { ref control_number, .. })
                if control_number == "0002"
        ));

        let out = String::from_utf8(generator.finish().unwrap()).unwrap();
        assert!(!out.contains("AK2*837*0002"));
        assert!(out.ends_with("AK5*A~\n"));
    }

    #[test]
    fn test_group_defaults_when_fields_unset() {
        let mut input = tree(vec![accepted("0001")]);
        input.groups[0].ack_code = None;
        input.groups[0].st_count_orig = None;
        input.groups[0].st_count_recv = None;

        let lines = render(&input).unwrap();
        assert!(lines.contains(&"AK9*R*0*0*0~".to_string()));
    }

    #[test]
    fn test_accepted_count_never_negative() {
        let rejected = TransactionResult {
            ack_code: Some(AckCode::Rejected),
            ..TransactionResult::new("837", "0001")
        };
        let mut input = tree(vec![rejected.clone(), rejected]);
        input.groups[0].st_count_recv = Some(1);

        let lines = render(&input).unwrap();
        assert!(lines.contains(&"AK9*P*2*1*0~".to_string()));
    }

    #[test]
    fn test_ta1_accepted() {
        let mut input = tree(vec![accepted("0001")]);
        input.ta1_req = Some("1".to_string());

        let lines = render(&input).unwrap();
        let n = lines.len();
        assert_eq!(lines[n - 3], "GE*1*17~");
        assert_eq!(lines[n - 2], "TA1*000000905*030424*1200*A*000~");
        assert_eq!(lines[n - 1], "IEA*1*304251501~");
    }

    #[test]
    fn test_ta1_rejected_reports_first_code() {
        let mut input = tree(vec![accepted("0001")]);
        input.ta1_req = Some("1".to_string());
        let mut ele = ElementResult::new(6);
        ele.add_error(
            ErrorRecord::new("E", "Invalid ISA06")
                .with_origin(x12_ir::EnvelopeSegment::Isa),
        );
        input.elements.push(ele);
        let mut ele = ElementResult::new(2);
        ele.add_error(
            ErrorRecord::new("E", "IEA02 mismatch")
                .with_origin(x12_ir::EnvelopeSegment::Iea),
        );
        input.elements.push(ele);

        let lines = render(&input).unwrap();
        assert!(lines.contains(&"TA1*000000905*030424*1200*R*006~".to_string()));
    }

    #[test]
    fn test_ta1_not_requested() {
        let mut input = tree(vec![accepted("0001")]);
        input.ta1_req = Some("0".to_string());
        let lines = render(&input).unwrap();
        assert!(lines.iter().all(|l| !l.starts_with("TA1")));
    }

    #[test]
    fn test_group_codes_in_ak9() {
        let mut input = tree(vec![accepted("0001")]);
        let mut ele = ElementResult::new(8);
        ele.add_error(
            ErrorRecord::new("E", "GS08 not supported").with_origin(x12_ir::EnvelopeSegment::Gs),
        );
        input.groups[0].elements.push(ele);

        let lines = render(&input).unwrap();
        assert!(lines.contains(&"AK9*A*1*1*1*2~".to_string()));
    }

    #[test]
    fn test_interchange_without_groups_is_malformed() {
        let input = InterchangeResult::default();
        let err = render(&input).unwrap_err();
        assert!(matches!(err, Error::Tree(x12_ir::Error::MalformedTree(_))));
    }

    #[test]
    fn test_bad_value_with_terminator_omitted() {
        let mut seg = SegmentResult::new("N3", 6);
        let mut ele = ElementResult::new(1);
        ele.add_error(ErrorRecord::new("6", "Invalid character").with_bad_value("12*MAIN"));
        seg.elements.push(ele);
        let st = TransactionResult {
            ack_code: Some(AckCode::Rejected),
            segments: vec![seg],
            ..TransactionResult::new("837", "0001")
        };

        let lines = render(&tree(vec![st])).unwrap();
        assert!(lines.contains(&"IK4*1**6~".to_string()));
    }

    #[test]
    fn test_transaction_numbers_continue_across_groups() {
        let mut input = tree(vec![accepted("0001")]);
        let second = input.groups[0].clone();
        input.groups.push(second);

        let lines = render(&input).unwrap();
        assert!(lines.contains(&"ST*999*0001~".to_string()));
        assert!(lines.contains(&"ST*999*0002~".to_string()));
        assert!(lines.contains(&"SE*6*0002~".to_string()));
        assert!(lines.contains(&"GE*2*17~".to_string()));
        assert!(lines.contains(&"IEA*1*304251501~".to_string()));
    }

    struct FailingSink;

    impl io::Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_stops_generation() {
        let mut generator =
            AckGenerator::with_clock(FailingSink, &AckConfig::default(), clock()).unwrap();
        let err = generator.generate(&tree(vec![accepted("0001")])).unwrap_err();
        assert!(matches!(err, Error::Output(x12_adapter::Error::Io(_))));
    }
}
