//! Three-round algebraic attack.
//!
//! Unlike the 2-round kernel, three rounds touch every key byte, so this
//! one fully determines `k7` and produces complete 56-bit candidates.
//! Four nested guesses (`k2`, `k1`, `k7`, `k3`) are pruned by three
//! algebraic consistency checks applied in sequence, each expected to
//! halve the survivor count.

use crate::cipher::tweak_bytes;
use crate::sbox::{inv_sub, sub};
use crate::tuple::Tuple;

pub fn run(t1: Tuple, t2: Tuple, mut on_candidate: impl FnMut(u64)) {
    let tw1 = tweak_bytes(t1.tw);
    let tw2 = tweak_bytes(t2.tw);

    let b1 = (((t1.pt >> 8) & 0xff) as u8) ^ tw1[2];
    let a1 = ((((t1.pt >> 16) ^ (t1.pt >> 8)) & 0xff) as u8) ^ tw1[0];
    let c1 = (((t1.pt ^ (t1.pt >> 8)) & 0xff) as u8) ^ tw1[1];
    let b2 = (((t2.pt >> 8) & 0xff) as u8) ^ tw2[2];
    let a2 = ((((t2.pt >> 16) ^ (t2.pt >> 8)) & 0xff) as u8) ^ tw2[0];
    let c2 = (((t2.pt ^ (t2.pt >> 8)) & 0xff) as u8) ^ tw2[1];

    let bppp1 = ((inv_sub(((t1.ct >> 8) & 0xff) as u8) as u32 ^ t1.ct ^ (t1.ct >> 16)) & 0xff) as u8
        ^ tw1[0];
    let appp1 = inv_sub(((t1.ct >> 16) & 0xff) as u8) ^ tw1[6];
    let cppp1 = inv_sub((t1.ct & 0xff) as u8) ^ tw1[7];
    let bppp2 = ((inv_sub(((t2.ct >> 8) & 0xff) as u8) as u32 ^ t2.ct ^ (t2.ct >> 16)) & 0xff) as u8
        ^ tw2[0];
    let appp2 = inv_sub(((t2.ct >> 16) & 0xff) as u8) ^ tw2[6];
    let cppp2 = inv_sub((t2.ct & 0xff) as u8) ^ tw2[7];

    let delta_bpp = bppp1 ^ bppp2;
    let delta_app = appp1 ^ appp2 ^ delta_bpp;
    let delta_cpp = cppp1 ^ cppp2 ^ delta_bpp;
    let delta_acpp = delta_app ^ delta_cpp;
    let delta_tw4 = tw1[3] ^ tw2[3];
    let delta_tw5 = tw1[4] ^ tw2[4];
    let delta_tw6 = tw1[5] ^ tw2[5];

    for k2 in 0..=255u8 {
        let bpp1 = bppp1 ^ k2;
        let bpp2 = bppp2 ^ k2;
        let sbpp1 = inv_sub(bpp1);
        let sbpp2 = inv_sub(bpp2);
        let delta_fbpp = sbpp1 ^ sbpp2 ^ delta_tw6;
        let cp1 = sub(c1 ^ k2);
        let cp2 = sub(c2 ^ k2);
        let delta_cp = cp1 ^ cp2;

        for k1 in 0..=255u8 {
            let ap1 = sub(a1 ^ k1);
            let ap2 = sub(a2 ^ k1);
            let cpp1 = cppp1 ^ k1 ^ bpp1;
            let cpp2 = cppp2 ^ k1 ^ bpp2;
            let scpp1 = inv_sub(cpp1);
            let scpp2 = inv_sub(cpp2);
            let delta_bp = delta_cp ^ scpp1 ^ scpp2 ^ delta_tw5;

            if delta_fbpp != (delta_acpp ^ delta_bp) {
                continue;
            }
            let delta_ap = ap1 ^ ap2 ^ delta_tw4;

            for k7 in 0..=255u8 {
                let app1 = appp1 ^ bpp1 ^ k7;
                let app2 = appp2 ^ bpp2 ^ k7;
                let sapp1 = inv_sub(app1);
                let sapp2 = inv_sub(app2);
                if (sapp1 ^ sapp2 ^ delta_ap) != delta_bp {
                    continue;
                }

                for k3 in 0..=255u8 {
                    let bp1 = sub(ap1 ^ cp1 ^ b1 ^ k3);
                    let bp2 = sub(ap2 ^ cp2 ^ b2 ^ k3);
                    let k4_1 = sapp1 ^ ap1 ^ bp1 ^ tw1[3];
                    let k4_2 = sapp2 ^ ap2 ^ bp2 ^ tw2[3];
                    let k5 = scpp1 ^ cp1 ^ bp1 ^ tw1[4];
                    let k6 = sbpp1 ^ app1 ^ cpp1 ^ bp1 ^ tw1[5];
                    if k4_1 == k4_2 {
                        let key = (k1 as u64) << 48
                            | (k2 as u64) << 40
                            | (k3 as u64) << 32
                            | (k4_1 as u64) << 24
                            | (k5 as u64) << 16
                            | (k6 as u64) << 8
                            | k7 as u64;
                        on_candidate(key);
                    }
                }
            }
        }
    }
}
