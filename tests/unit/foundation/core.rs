use super::*;

#[test]
fn timestamp_from_frame_uses_microseconds() {
    assert_eq!(Timestamp::from_frame(0, 30), Some(Timestamp(0)));
    assert_eq!(Timestamp::from_frame(30, 30), Some(Timestamp(1_000_000)));
    assert_eq!(Timestamp::from_frame(1, 25), Some(Timestamp(40_000)));
}

#[test]
fn timestamp_from_frame_rejects_zero_fps() {
    assert_eq!(Timestamp::from_frame(0, 0), None);
    assert_eq!(Timestamp::from_frame(10, 0), None);
}

#[test]
fn timestamps_order_by_value() {
    assert!(Timestamp(-1) < Timestamp(0));
    assert!(Timestamp(5) < Timestamp(6));
    assert_eq!(Timestamp(1_500_000).as_secs_f64(), 1.5);
}

#[test]
fn packet_map_keeps_timestamp() {
    let p = Packet::new(Timestamp(7), 21u32);
    let q = p.map(|v| v * 2);
    assert_eq!(q.timestamp, Timestamp(7));
    assert_eq!(q.into_payload(), 42);
}
