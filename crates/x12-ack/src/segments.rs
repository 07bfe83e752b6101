//! 999 body segment assembly (AK1, AK2, IK3, IK4, AK5, AK9)

use x12_adapter::OutputSegment;
use x12_ir::{AckCode, ElementResult, GsHeader, SegmentResult, TransactionResult};

use crate::codes::AK5_MAX_CODES;

/// IK3 position of the syntax error code
const IK304: usize = 4;
/// IK4 position of the syntax error code
const IK403: usize = 3;
/// IK4 position of the offending data
const IK404: usize = 4;

/// AK1 - Functional Group Response Header
pub fn generate_ak1(gs: &GsHeader) -> OutputSegment {
    let mut seg = OutputSegment::new("AK1");
    seg.push(gs.functional_id.as_str())
        .push(gs.control_number.as_str());
    seg
}

/// AK2 - Transaction Set Response Header
pub fn generate_ak2(st: &TransactionResult) -> OutputSegment {
    let mut seg = OutputSegment::new("AK2");
    seg.push(st.trn_set_id.as_str())
        .push(st.trn_set_control_num.trim());
    seg
}

/// IK3 without its error code: segment id, position, loop id
pub fn ik3_template(seg: &SegmentResult) -> OutputSegment {
    let mut ik3 = OutputSegment::new("IK3");
    ik3.push(seg.seg_id.as_str())
        .push(seg.seg_count.to_string())
        .push(seg.ls_id.as_deref().unwrap_or_default());
    ik3
}

/// IK3 - Error Identification, one per code
pub fn generate_ik3(template: &OutputSegment, code: &str) -> OutputSegment {
    let mut ik3 = template.clone();
    ik3.set(IK304, code);
    ik3
}

/// IK4 without its error code: position (composite when a component is
/// named) and element reference number
pub fn ik4_template(ele: &ElementResult) -> OutputSegment {
    let mut ik4 = OutputSegment::new("IK4");
    match ele.subele_pos {
        Some(sub) => ik4.push_composite(vec![ele.ele_pos.to_string(), sub.to_string()]),
        None => ik4.push(ele.ele_pos.to_string()),
    };
    ik4.push(ele.ele_ref_num.as_deref().unwrap_or_default());
    ik4
}

/// IK4 - Implementation Data Element Note, one per finding
pub fn generate_ik4(template: &OutputSegment, code: &str, bad_value: Option<&str>) -> OutputSegment {
    let mut ik4 = template.clone();
    ik4.set(IK403, code);
    if let Some(value) = bad_value {
        ik4.set(IK404, value);
    }
    ik4
}

/// AK5 - Transaction Set Response Trailer
///
/// At most [`AK5_MAX_CODES`] codes are written; the rest are dropped.
pub fn generate_ak5(ack_code: AckCode, codes: &[String]) -> OutputSegment {
    let mut seg = OutputSegment::new("AK5");
    seg.push(ack_code.as_str());
    for code in codes.iter().take(AK5_MAX_CODES) {
        seg.push(code.as_str());
    }
    seg
}

/// AK9 - Functional Group Response Trailer
pub fn generate_ak9(
    ack_code: AckCode,
    st_count_orig: u32,
    st_count_recv: u32,
    st_count_accepted: u32,
    codes: &[String],
) -> OutputSegment {
    let mut seg = OutputSegment::new("AK9");
    seg.push(ack_code.as_str())
        .push(st_count_orig.to_string())
        .push(st_count_recv.to_string())
        .push(st_count_accepted.to_string());
    for code in codes {
        seg.push(code.as_str());
    }
    seg
}
