//! Error code mapping
//!
//! Translates findings on the validation tree into the code lists each 999
//! (and TA1) segment is allowed to carry. Codes outside a level's allowed
//! set are dropped, not escalated.
//!
//! Sorted code lists are ordered as strings, so `"10"` sorts before `"2"`.
//! Existing trading partners receive this order today.

use std::collections::BTreeSet;

use tracing::trace;
use x12_ir::{
    ElementResult, EnvelopeSegment, Error, GroupResult, InterchangeResult, Level, Result,
    SegmentResult, TransactionResult,
};

/// IK304 implementation segment syntax error codes
pub const IK3_CODES: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];

/// IK403 implementation data element syntax error codes
pub const IK4_CODES: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"];

/// IK304 "segment has implementation data element errors"
pub const SEGMENT_HAS_ELEMENT_ERRORS: &str = "8";

/// Validator code folded into [`SEGMENT_HAS_ELEMENT_ERRORS`]
pub const SEG1: &str = "SEG1";

/// AK5 "one or more segments in error"
pub const SEGMENTS_IN_ERROR: &str = "5";

/// Maximum number of AK5 syntax error codes (AK502..AK506)
pub const AK5_MAX_CODES: usize = 5;

/// TA105 note code for an interchange without errors
pub const TA1_NO_ERROR: &str = "000";

/// Code reported for an envelope element finding
///
/// Returns `None` when the position has no code at that envelope segment;
/// GS and GE map every position.
pub fn envelope_element_code(origin: EnvelopeSegment, ele_pos: u32) -> Option<&'static str> {
    match origin {
        EnvelopeSegment::Isa => match ele_pos {
            1 => Some("010"),
            2 => Some("011"),
            3 => Some("012"),
            4 => Some("013"),
            5 => Some("005"),
            6 => Some("006"),
            7 => Some("007"),
            8 => Some("008"),
            9 => Some("014"),
            10 => Some("015"),
            11 => Some("016"),
            12 => Some("017"),
            13 => Some("018"),
            14 => Some("019"),
            15 => Some("020"),
            16 => Some("027"),
            _ => None,
        },
        EnvelopeSegment::Iea => match ele_pos {
            1 => Some("021"),
            2 => Some("018"),
            _ => None,
        },
        EnvelopeSegment::Gs => match ele_pos {
            6 => Some("6"),
            8 => Some("2"),
            _ => Some("1"),
        },
        EnvelopeSegment::Ge => match ele_pos {
            2 => Some("6"),
            _ => Some("1"),
        },
        EnvelopeSegment::St | EnvelopeSegment::Se => match ele_pos {
            1 => Some("6"),
            2 => Some("7"),
            _ => None,
        },
    }
}

/// Codes for envelope element findings that belong to `level`
fn envelope_codes(elements: &[ElementResult], level: Level) -> Result<Vec<&'static str>> {
    let mut codes = Vec::new();
    for ele in elements {
        for err in &ele.errors {
            let Some(origin) = err.origin.filter(|o| o.level() == level) else {
                continue;
            };
            let code = envelope_element_code(origin, ele.ele_pos).ok_or_else(|| {
                Error::malformed(format!(
                    "{origin} has no element at position {}",
                    ele.ele_pos
                ))
            })?;
            codes.push(code);
        }
    }
    Ok(codes)
}

/// TA1 note codes, deduplicated in the order found
///
/// Interchange findings come first, then ISA/IEA element findings. Only the
/// first code is reported.
///
/// # Errors
///
/// Returns [`Error::MalformedTree`] for an ISA or IEA position outside the
/// segment.
pub fn interchange_codes(isa: &InterchangeResult) -> Result<Vec<String>> {
    let mut found: Vec<&str> = isa.errors.iter().map(|err| err.code.as_str()).collect();
    found.extend(envelope_codes(&isa.elements, Level::Interchange)?);

    let mut codes: Vec<String> = Vec::with_capacity(found.len());
    for code in found {
        if !codes.iter().any(|c| c == code) {
            codes.push(code.to_string());
        }
    }
    Ok(codes)
}

/// AK9 functional group syntax error codes, deduplicated and sorted
///
/// # Errors
///
/// Does not fail in practice: GS and GE map every element position.
pub fn group_codes(gs: &GroupResult) -> Result<Vec<String>> {
    let mut codes: BTreeSet<String> = gs.errors.iter().map(|err| err.code.clone()).collect();
    codes.extend(
        envelope_codes(&gs.elements, Level::Group)?
            .into_iter()
            .map(str::to_string),
    );
    Ok(codes.into_iter().collect())
}

/// AK5 transaction set syntax error codes, deduplicated and sorted
///
/// The list is not capped here; the AK5 assembler keeps the first
/// [`AK5_MAX_CODES`].
///
/// # Errors
///
/// Returns [`Error::MalformedTree`] for an ST or SE position outside the
/// segment.
pub fn transaction_codes(st: &TransactionResult) -> Result<Vec<String>> {
    let mut codes: BTreeSet<String> = st.errors.iter().map(|err| err.code.clone()).collect();
    if st.child_err_count() > 0 {
        codes.insert(SEGMENTS_IN_ERROR.to_string());
    }
    codes.extend(
        envelope_codes(&st.elements, Level::Transaction)?
            .into_iter()
            .map(str::to_string),
    );
    Ok(codes.into_iter().collect())
}

/// IK304 codes for one segment occurrence, one IK3 per code
///
/// `SEG1` is reported as `8`. A segment with element findings always gets
/// a `8`, appended last when the segment did not already carry one.
pub fn segment_codes(seg: &SegmentResult) -> Vec<String> {
    let own: BTreeSet<&str> = seg
        .errors
        .iter()
        .map(|err| match err.code.as_str() {
            SEG1 => SEGMENT_HAS_ELEMENT_ERRORS,
            code => code,
        })
        .collect();

    let mut codes: Vec<String> = Vec::with_capacity(own.len() + 1);
    for code in &own {
        if IK3_CODES.contains(code) {
            codes.push((*code).to_string());
        } else {
            trace!(segment = %seg.seg_id, code, "Dropped code not allowed in IK3");
        }
    }

    if seg.child_err_count() > 0 && !own.contains(SEGMENT_HAS_ELEMENT_ERRORS) {
        codes.push(SEGMENT_HAS_ELEMENT_ERRORS.to_string());
    }
    codes
}

/// IK403 codes with their offending values, one IK4 per finding
///
/// Findings are not deduplicated: each recorded error with an allowed code
/// is reported.
pub fn element_codes(ele: &ElementResult) -> Vec<(&str, Option<&str>)> {
    ele.errors
        .iter()
        .filter(|err| {
            let allowed = IK4_CODES.contains(&err.code.as_str());
            if !allowed {
                trace!(ele_pos = ele.ele_pos, code = %err.code, "Dropped code not allowed in IK4");
            }
            allowed
        })
        .map(|err| (err.code.as_str(), err.bad_value()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use x12_ir::ErrorRecord;

    fn element(pos: u32, errors: Vec<ErrorRecord>) -> ElementResult {
        ElementResult {
            errors,
            ..ElementResult::new(pos)
        }
    }

    fn envelope_error(origin: EnvelopeSegment) -> ErrorRecord {
        ErrorRecord::new("E", format!("{origin} element invalid")).with_origin(origin)
    }

    #[test]
    fn test_isa_table() {
        let expected = [
            "010", "011", "012", "013", "005", "006", "007", "008", "014", "015", "016", "017",
            "018", "019", "020", "027",
        ];
        for (i, code) in expected.iter().enumerate() {
            let pos = u32::try_from(i + 1).unwrap();
            assert_eq!(envelope_element_code(EnvelopeSegment::Isa, pos), Some(*code));
        }
        assert_eq!(envelope_element_code(EnvelopeSegment::Isa, 17), None);
    }

    #[test]
    fn test_iea_table() {
        assert_eq!(envelope_element_code(EnvelopeSegment::Iea, 1), Some("021"));
        assert_eq!(envelope_element_code(EnvelopeSegment::Iea, 2), Some("018"));
        assert_eq!(envelope_element_code(EnvelopeSegment::Iea, 3), None);
    }

    #[test]
    fn test_gs_ge_tables_default_to_one() {
        assert_eq!(envelope_element_code(EnvelopeSegment::Gs, 6), Some("6"));
        assert_eq!(envelope_element_code(EnvelopeSegment::Gs, 8), Some("2"));
        assert_eq!(envelope_element_code(EnvelopeSegment::Gs, 2), Some("1"));
        assert_eq!(envelope_element_code(EnvelopeSegment::Ge, 2), Some("6"));
        assert_eq!(envelope_element_code(EnvelopeSegment::Ge, 1), Some("1"));
    }

    #[test]
    fn test_st_se_tables() {
        for origin in [EnvelopeSegment::St, EnvelopeSegment::Se] {
            assert_eq!(envelope_element_code(origin, 1), Some("6"));
            assert_eq!(envelope_element_code(origin, 2), Some("7"));
            assert_eq!(envelope_element_code(origin, 3), None);
        }
    }

    #[test]
    fn test_interchange_codes_keep_first_seen_order() {
        let mut isa = InterchangeResult::default();
        isa.errors.push(ErrorRecord::new("022", "Invalid control structure"));
        isa.elements.push(element(13, vec![envelope_error(EnvelopeSegment::Isa)]));
        isa.elements.push(element(1, vec![envelope_error(EnvelopeSegment::Iea)]));
        isa.elements.push(element(13, vec![envelope_error(EnvelopeSegment::Isa)]));

        assert_eq!(interchange_codes(&isa).unwrap(), vec!["022", "018", "021"]);
    }

    #[test]
    fn test_interchange_codes_ignore_other_levels() {
        let mut isa = InterchangeResult::default();
        isa.elements.push(element(6, vec![envelope_error(EnvelopeSegment::Gs)]));
        isa.elements.push(element(6, vec![ErrorRecord::new("7", "no origin")]));

        assert!(interchange_codes(&isa).unwrap().is_empty());
    }

    #[test]
    fn test_interchange_codes_bad_position_is_malformed() {
        let mut isa = InterchangeResult::default();
        isa.elements.push(element(3, vec![envelope_error(EnvelopeSegment::Iea)]));

        let err = interchange_codes(&isa).unwrap_err();
        assert!(matches!(err, Error::MalformedTree(_)));
    }

    #[test]
    fn test_group_codes_sorted_and_deduplicated() {
        let mut gs = GroupResult::default();
        gs.errors.push(ErrorRecord::new("5", "Count mismatch"));
        gs.elements.push(element(6, vec![envelope_error(EnvelopeSegment::Gs)]));
        gs.elements.push(element(2, vec![envelope_error(EnvelopeSegment::Ge)]));
        gs.elements.push(element(3, vec![envelope_error(EnvelopeSegment::Gs)]));

        assert_eq!(group_codes(&gs).unwrap(), vec!["1", "5", "6"]);
    }

    #[test]
    fn test_transaction_codes_add_segments_in_error() {
        let mut st = TransactionResult::new("837", "0001");
        assert!(transaction_codes(&st).unwrap().is_empty());

        let mut seg = SegmentResult::new("NM1", 4);
        seg.errors.push(ErrorRecord::new("3", "Mandatory segment missing"));
        st.segments.push(seg);
        st.elements.push(element(2, vec![envelope_error(EnvelopeSegment::Se)]));

        assert_eq!(transaction_codes(&st).unwrap(), vec!["5", "7"]);
    }

    #[test]
    fn test_transaction_codes_sort_as_strings() {
        let mut st = TransactionResult::new("837", "0001");
        for code in ["2", "10", "23", "3"] {
            st.errors.push(ErrorRecord::new(code, ""));
        }
        assert_eq!(transaction_codes(&st).unwrap(), vec!["10", "2", "23", "3"]);
    }

    #[test]
    fn test_segment_codes_child_errors_only() {
        let mut seg = SegmentResult::new("CLM", 2);
        seg.elements.push(element(1, vec![ErrorRecord::new("1", "Missing")]));
        assert_eq!(segment_codes(&seg), vec!["8"]);
    }

    #[test]
    fn test_segment_codes_seg1_becomes_eight() {
        let mut seg = SegmentResult::new("CLM", 2);
        seg.errors.push(ErrorRecord::new("SEG1", "Segment has element errors"));
        seg.elements.push(element(1, vec![ErrorRecord::new("1", "Missing")]));
        assert_eq!(segment_codes(&seg), vec!["8"]);
    }

    #[test]
    fn test_segment_codes_filter_and_deduplicate() {
        let mut seg = SegmentResult::new("REF", 9);
        for code in ["3", "I6", "3", "5", "9"] {
            seg.errors.push(ErrorRecord::new(code, ""));
        }
        assert_eq!(segment_codes(&seg), vec!["3", "5"]);
    }

    #[test]
    fn test_segment_codes_eight_appended_last() {
        let mut seg = SegmentResult::new("REF", 9);
        seg.errors.push(ErrorRecord::new("2", "Unexpected segment"));
        seg.elements.push(element(2, vec![ErrorRecord::new("7", "Invalid code")]));
        assert_eq!(segment_codes(&seg), vec!["2", "8"]);
    }

    #[test]
    fn test_element_codes_not_deduplicated() {
        let ele = element(
            2,
            vec![
                ErrorRecord::new("7", "Invalid code").with_bad_value("ZZ"),
                ErrorRecord::new("7", "Invalid code").with_bad_value("YY"),
                ErrorRecord::new("I10", "Implementation not used"),
                ErrorRecord::new("10", "Exclusion condition violated"),
            ],
        );
        assert_eq!(
            element_codes(&ele),
            vec![("7", Some("ZZ")), ("7", Some("YY")), ("10", None)]
        );
    }
}
