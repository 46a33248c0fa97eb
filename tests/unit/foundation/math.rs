use super::*;

#[test]
fn fnv_is_incremental() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"vtstyle");
    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"vt");
    b.write_bytes(b"style");
    assert_eq!(a.finish(), b.finish());
    assert_eq!(Fnv1a64::new_default().finish(), 0xcbf2_9ce4_8422_2325);
}

#[test]
fn fnv_distinguishes_u64_inputs() {
    let mut a = Fnv1a64::new_default();
    a.write_u64(1);
    let mut b = Fnv1a64::new_default();
    b.write_u64(2);
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn mul_div255_edges() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(255, 128), 128);
}
