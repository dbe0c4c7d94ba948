//! Machine-readable documents emitted by the `wirecmp` tool.

use serde::Serialize;
use wirecmp_contracts::{
    WIRECMP_COMPARE_REPORT_SCHEMA_VERSION, WIRECMP_DUMP_REPORT_SCHEMA_VERSION,
};

use crate::compare::CompareResult;
use crate::field_set::{CanonicalFields, FieldSetRef, FieldValue};
use crate::limits::Limits;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSummary {
    pub path: String,
    pub len: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompareReport {
    pub schema_version: String,
    pub result: CompareResult,
    pub equal: bool,
    pub max_depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arena_bytes: Option<usize>,
    pub inputs: Vec<InputSummary>,
}

impl CompareReport {
    pub fn new(result: CompareResult, limits: &Limits, inputs: Vec<InputSummary>) -> Self {
        Self {
            schema_version: WIRECMP_COMPARE_REPORT_SCHEMA_VERSION.to_string(),
            result,
            equal: result.is_equal(),
            max_depth: limits.max_depth,
            arena_bytes: limits.arena_bytes,
            inputs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpReport {
    pub schema_version: String,
    pub input: InputSummary,
    pub fields: Vec<FieldDump>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDump {
    pub field: u32,
    pub wire_type: &'static str,
    pub tag: u32,
    pub value: DumpValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpValue {
    Varint(u64),
    Fixed64(u64),
    Fixed32(u32),
    BytesHex(String),
    Group(Vec<FieldDump>),
}

pub fn dump_report(input: InputSummary, fields: &CanonicalFields<'_>) -> DumpReport {
    DumpReport {
        schema_version: WIRECMP_DUMP_REPORT_SCHEMA_VERSION.to_string(),
        input,
        fields: dump_set(fields.root()),
    }
}

fn dump_set(set: FieldSetRef<'_, '_>) -> Vec<FieldDump> {
    set.iter()
        .map(|f| FieldDump {
            field: f.field_number(),
            wire_type: f.wire_type().map_or("invalid", |wt| wt.as_str()),
            tag: f.tag(),
            value: match f.value() {
                FieldValue::Varint(v) => DumpValue::Varint(v),
                FieldValue::Fixed64(v) => DumpValue::Fixed64(v),
                FieldValue::Fixed32(v) => DumpValue::Fixed32(v),
                FieldValue::Delimited(bytes) => DumpValue::BytesHex(hex::encode(bytes)),
                FieldValue::Group(inner) => DumpValue::Group(dump_set(inner)),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::compare::parse;

    fn summary(len: usize) -> InputSummary {
        InputSummary {
            path: "in.bin".to_string(),
            len,
            sha256: "00".to_string(),
        }
    }

    #[test]
    fn compare_report_serializes_result_and_limits() {
        let report = CompareReport::new(
            CompareResult::MaxDepthExceeded,
            &Limits::with_max_depth(2),
            vec![summary(1), summary(2)],
        );
        let v = serde_json::to_value(&report).expect("encode report");
        assert_eq!(v["schema_version"], WIRECMP_COMPARE_REPORT_SCHEMA_VERSION);
        assert_eq!(v["result"], "max_depth_exceeded");
        assert_eq!(v["equal"], false);
        assert_eq!(v["max_depth"], 2);
        assert!(v.get("arena_bytes").is_none());
        assert_eq!(v["inputs"][1]["len"], 2);
    }

    #[test]
    fn dump_lists_canonical_order_with_tagged_values() {
        // 3: group { 1: "hi" }, 2: fixed32 1, 1: varint 150
        let buf = [
            0x1b, 0x0a, 0x02, b'h', b'i', 0x1c, 0x15, 0x01, 0x00, 0x00, 0x00, 0x08, 0x96, 0x01,
        ];
        let fields = parse(&buf, &Limits::default()).expect("parse");
        let report = dump_report(summary(buf.len()), &fields);
        let v = serde_json::to_value(&report).expect("encode dump");
        assert_eq!(v["schema_version"], WIRECMP_DUMP_REPORT_SCHEMA_VERSION);
        assert_eq!(
            v["fields"],
            json!([
                {"field": 1, "wire_type": "varint", "tag": 8, "value": {"varint": 150}},
                {"field": 2, "wire_type": "fixed32", "tag": 21, "value": {"fixed32": 1}},
                {"field": 3, "wire_type": "group", "tag": 27, "value": {"group": [
                    {"field": 1, "wire_type": "delimited", "tag": 10, "value": {"bytes_hex": "6869"}}
                ]}},
            ])
        );
    }
}
