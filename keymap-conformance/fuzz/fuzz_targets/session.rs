#![no_main]
use libfuzzer_sys::fuzz_target;

use keymap::{HashMap, Map, TreeMap};
use keymap_conformance::{Op, Reference, Session};

fn replay<M: Map<u8, u8>>(ops: &[Op<u8, u8>]) {
    let mut session = Session::new(M::new(), Reference::new());
    for op in ops {
        if let Err(divergence) = session.apply(op) {
            panic!("{}", divergence);
        }
    }
}

fuzz_target!(|ops: Vec<Op<u8, u8>>| {
    replay::<HashMap<u8, u8>>(&ops);
    replay::<TreeMap<u8, u8>>(&ops);
});
