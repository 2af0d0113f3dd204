use cfreg_primitives::{Address, Location, SubSalt};
use cfreg_store::{effective_salt, predict_location};

#[test]
fn golden_hello_location() {
    let store_id = Address([0x5A; 20]);
    let salt = effective_salt(&Address([0x01; 20]), &SubSalt::from_u64(0));
    let expected: Location = "0x2bf33e0170c332af4c129fdcc4db8a4e24d7e3b4".parse().unwrap();
    assert_eq!(predict_location(&store_id, b"hello", &salt), expected);
}
