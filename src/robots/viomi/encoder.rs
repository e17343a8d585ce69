//! `set_zone` argument encoding.
//!
//! Each zone repetition becomes one record
//! `index_kind_x1_y1_x2_y2_x3_y3_x4_y4` with device coordinates at four
//! decimal places. The command argument is the record count followed by all
//! records. Indices run across the whole batch, not per zone.

use super::common::ViomiArea;
use crate::capabilities::CleaningZone;
use crate::map::{CoordinateTransform, DevicePoint, format_coordinate};
use serde_json::Value;

pub const ZONE_FIELD_DELIMITER: &str = "_";

/// Encode one zone repetition.
///
/// Corners are emitted in the fixed winding order
/// `(pA.x, pA.y) -> (pA.x, pC.y) -> (pC.x, pC.y) -> (pC.x, pA.y)`.
pub fn encode_zone_record(index: usize, area: ViomiArea, pa: DevicePoint, pc: DevicePoint) -> String {
    let fields = [
        index.to_string(),
        (area as u8).to_string(),
        format_coordinate(pa.x),
        format_coordinate(pa.y),
        format_coordinate(pa.x),
        format_coordinate(pc.y),
        format_coordinate(pc.x),
        format_coordinate(pc.y),
        format_coordinate(pc.x),
        format_coordinate(pa.y),
    ];
    fields.join(ZONE_FIELD_DELIMITER)
}

/// Encode every repetition of every zone, in request order.
pub fn encode_zones(zones: &[CleaningZone], transform: &CoordinateTransform) -> Vec<String> {
    let mut records = Vec::new();

    for zone in zones {
        let pa = transform.to_device(zone.pa);
        let pc = transform.to_device(zone.pc);

        for _ in 0..zone.iterations {
            records.push(encode_zone_record(records.len(), ViomiArea::Normal, pa, pc));
        }
    }

    records
}

/// `set_zone` arguments: record count followed by the records.
pub fn zone_command_args(records: &[String]) -> Value {
    let mut args = Vec::with_capacity(records.len() + 1);
    args.push(Value::from(records.len()));
    args.extend(records.iter().cloned().map(Value::String));
    Value::Array(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapPoint;
    use serde_json::json;

    const TRANSFORM: CoordinateTransform =
        CoordinateTransform::new(100.0, 2000.0, 2000.0, true, (0.0, 4000.0));

    #[test]
    fn test_record_layout() {
        let record = encode_zone_record(
            4,
            ViomiArea::Normal,
            DevicePoint { x: 1.0, y: -2.5 },
            DevicePoint { x: 3.25, y: 0.125 },
        );
        assert_eq!(
            record,
            "4_0_1.0000_-2.5000_1.0000_0.1250_3.2500_0.1250_3.2500_-2.5000"
        );
    }

    #[test]
    fn test_iterations_produce_sequential_records() {
        let zone = CleaningZone::new(MapPoint::new(2100.0, 1900.0), MapPoint::new(2350.0, 1500.0), 3);
        let records = encode_zones(&[zone], &TRANSFORM);

        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            let fields: Vec<&str> = record.split(ZONE_FIELD_DELIMITER).collect();
            assert_eq!(fields.len(), 10);
            assert_eq!(fields[0], i.to_string());
            for coordinate in &fields[2..] {
                let decimals = coordinate.split('.').nth(1).unwrap();
                assert_eq!(decimals.len(), 4, "{}", coordinate);
            }
        }
        assert_eq!(
            records[0],
            "0_0_1.0000_1.0000_1.0000_5.0000_3.5000_5.0000_3.5000_1.0000"
        );
    }

    #[test]
    fn test_indices_are_global_across_zones() {
        let a = CleaningZone::new(MapPoint::new(2000.0, 2000.0), MapPoint::new(2100.0, 1900.0), 2);
        let b = CleaningZone::new(MapPoint::new(1000.0, 1000.0), MapPoint::new(1100.0, 900.0), 1);
        let records = encode_zones(&[a, b], &TRANSFORM);

        let indices: Vec<&str> = records
            .iter()
            .map(|r| r.split(ZONE_FIELD_DELIMITER).next().unwrap())
            .collect();
        assert_eq!(indices, vec!["0", "1", "2"]);
        assert!(records[2].starts_with("2_0_-10.0000_10.0000_"));
    }

    #[test]
    fn test_command_args() {
        let records = vec!["a".to_string(), "b".to_string()];
        assert_eq!(zone_command_args(&records), json!([2, "a", "b"]));
        assert_eq!(zone_command_args(&[]), json!([0]));
    }
}
