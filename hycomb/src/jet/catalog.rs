//! Compiled-in jet definitions.
//!
//! Structural jets carry the combinator expansion their commitment is
//! derived from; primitive jets are opaque and commit to their name.
use crate::{
    jet::JetSet,
    node::{NodeId, builder::ProgramBuilder},
};

pub(crate) enum Body {
    Structural(fn(&mut ProgramBuilder) -> NodeId),
    Primitive,
}

pub(crate) struct JetDef {
    pub name: &'static str,
    pub source: &'static str,
    pub target: &'static str,
    pub body: Body,
}

const fn structural(
    name: &'static str,
    source: &'static str,
    target: &'static str,
    build: fn(&mut ProgramBuilder) -> NodeId,
) -> JetDef {
    JetDef {
        name,
        source,
        target,
        body: Body::Structural(build),
    }
}

const fn primitive(name: &'static str, source: &'static str, target: &'static str) -> JetDef {
    JetDef {
        name,
        source,
        target,
        body: Body::Primitive,
    }
}

/// SHA-256 streaming context: 512-bit buffer, 64-bit length, 256-bit midstate.
const CTX8: &str = "**hh*lh";

static CORE: &[JetDef] = &[
    structural("verify", "2", "1", verify),
    structural("low_1", "1", "2", low_1),
    structural("high_1", "1", "2", high_1),
    structural("complement_1", "2", "2", complement_1),
    structural("and_1", "*22", "2", and_1),
    structural("or_1", "*22", "2", or_1),
    structural("xor_1", "*22", "2", xor_1),
    structural("eq_1", "*22", "2", eq_1),
    structural("ch_1", "*2*22", "2", ch_1),
    structural("half_add_1", "*22", "*22", half_add_1),
    structural("eq_8", "*cc", "2", eq_8),
    structural("eq_16", "*ss", "2", eq_16),
    structural("eq_32", "*ii", "2", eq_32),
    structural("eq_64", "*ll", "2", eq_64),
    structural("eq_256", "*hh", "2", eq_256),
    primitive("sha_256_iv", "1", "h"),
    primitive("sha_256_ctx_8_init", "1", CTX8),
    primitive("sha_256_ctx_8_add_32", "***hh*lhh", CTX8),
    primitive("sha_256_ctx_8_finalize", CTX8, "h"),
    primitive("bip_0340_verify", "**hh*hh", "1"),
];

static ELEMENTS: &[JetDef] = &[
    primitive("sig_all_hash", "1", "h"),
    primitive("version", "1", "i"),
    primitive("lock_time", "1", "i"),
    primitive("current_index", "1", "i"),
    primitive("check_lock_height", "i", "1"),
];

/// Definitions of `set`, in wire-index order.
pub(crate) fn definitions(set: JetSet) -> impl Iterator<Item = &'static JetDef> {
    let extra: &'static [JetDef] = match set {
        JetSet::Core => &[],
        JetSet::Elements => ELEMENTS,
    };
    CORE.iter().chain(extra)
}

pub(crate) fn definition(name: &str) -> Option<&'static JetDef> {
    definitions(JetSet::Elements).find(|def| def.name == name)
}

fn verify(b: &mut ProgramBuilder) -> NodeId {
    let iden = b.iden();
    let unit = b.unit();
    let dup = b.pair(iden, unit);
    let fail = b.fail();
    let unit = b.unit();
    let check = b.case(fail, unit);
    b.comp(dup, check)
}

fn low_1(b: &mut ProgramBuilder) -> NodeId {
    let unit = b.unit();
    b.injl(unit)
}

fn high_1(b: &mut ProgramBuilder) -> NodeId {
    let unit = b.unit();
    b.injr(unit)
}

fn complement_1(b: &mut ProgramBuilder) -> NodeId {
    let iden = b.iden();
    let unit = b.unit();
    let dup = b.pair(iden, unit);
    let one = high_1(b);
    let zero = low_1(b);
    let flip = b.case(one, zero);
    b.comp(dup, flip)
}

fn and_1(b: &mut ProgramBuilder) -> NodeId {
    let zero = low_1(b);
    let iden = b.iden();
    let second = b.drop(iden);
    b.case(zero, second)
}

fn or_1(b: &mut ProgramBuilder) -> NodeId {
    let iden = b.iden();
    let second = b.drop(iden);
    let one = high_1(b);
    b.case(second, one)
}

fn xor_1(b: &mut ProgramBuilder) -> NodeId {
    let iden = b.iden();
    let second = b.drop(iden);
    let not = complement_1(b);
    let not_second = b.drop(not);
    b.case(second, not_second)
}

fn eq_1(b: &mut ProgramBuilder) -> NodeId {
    let not = complement_1(b);
    let not_second = b.drop(not);
    let iden = b.iden();
    let second = b.drop(iden);
    b.case(not_second, second)
}

fn ch_1(b: &mut ProgramBuilder) -> NodeId {
    let iden = b.iden();
    let inner = b.drop(iden);
    let third = b.drop(inner);
    let iden = b.iden();
    let inner = b.take(iden);
    let second = b.drop(inner);
    b.case(third, second)
}

fn half_add_1(b: &mut ProgramBuilder) -> NodeId {
    let zero = low_1(b);
    let iden = b.iden();
    let no_carry = b.pair(zero, iden);
    let left = b.drop(no_carry);
    let iden = b.iden();
    let not = complement_1(b);
    let carry = b.pair(iden, not);
    let right = b.drop(carry);
    b.case(left, right)
}

/// Equality of two `2^bits` words, splitting each word into halves.
///
/// The half-width comparator is built once and shared by both halves.
fn eq_word(b: &mut ProgramBuilder, bits: u32) -> NodeId {
    if bits == 1 {
        return eq_1(b);
    }
    let half = eq_word(b, bits / 2);

    // Compare the halves selected by `project` on both sides.
    fn compare(
        b: &mut ProgramBuilder,
        half: NodeId,
        project: fn(&mut ProgramBuilder, NodeId) -> NodeId,
    ) -> NodeId {
        let iden = b.iden();
        let inner = project(b, iden);
        let lhs = b.take(inner);
        let iden = b.iden();
        let inner = project(b, iden);
        let rhs = b.drop(inner);
        let both = b.pair(lhs, rhs);
        b.comp(both, half)
    }
    let high = compare(b, half, ProgramBuilder::take);
    let low = compare(b, half, ProgramBuilder::drop);

    let both = b.pair(high, low);
    let and = and_1(b);
    b.comp(both, and)
}

fn eq_8(b: &mut ProgramBuilder) -> NodeId {
    eq_word(b, 8)
}

fn eq_16(b: &mut ProgramBuilder) -> NodeId {
    eq_word(b, 16)
}

fn eq_32(b: &mut ProgramBuilder) -> NodeId {
    eq_word(b, 32)
}

fn eq_64(b: &mut ProgramBuilder) -> NodeId {
    eq_word(b, 64)
}

fn eq_256(b: &mut ProgramBuilder) -> NodeId {
    eq_word(b, 256)
}
