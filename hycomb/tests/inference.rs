use hycomb::{
    DecodeError, Program,
    commit::Cmr,
    jet::JetSet,
    node::builder::ProgramBuilder,
    types::{RENDER_BUDGET, TypeRef, TypeTable},
};

fn check(builder: ProgramBuilder) -> Result<Program, DecodeError> {
    let (nodes, types) = builder.finish();
    Program::from_parts(nodes, types, JetSet::Elements)
}

/// A builder whose first node is a witness `1 → ty`, for `ty` built by `make`.
fn with_input(
    make: impl FnOnce(&mut hycomb::types::TypeTable) -> hycomb::types::TypeRef,
) -> (ProgramBuilder, hycomb::node::NodeId) {
    let mut b = ProgramBuilder::new();
    let unit = b.types_mut().unit();
    let ty = make(b.types_mut());
    let input = b.witness(unit, ty, vec![]);
    (b, input)
}

#[test]
fn projections_and_injections() {
    let (mut b, input) = with_input(|t| {
        let u = t.unit();
        let bit = t.word(1);
        t.product(bit, u)
    });
    let iden = b.iden();
    let first = b.take(iden);
    let wrapped = b.injr(first);
    let produce = b.comp(input, wrapped);
    let unit = b.types_mut().unit();
    let bit = b.types_mut().word(1);
    let either = b.types_mut().sum(unit, bit);
    let consume = b.witness(either, unit, vec![]);
    b.comp(produce, consume);

    let program = check(b).unwrap();
    assert_eq!(program.type_arrow(), "1 → 1");
    let types = program.types();
    assert_eq!(program.node(first).arrow().fmt(types).to_string(), "(2 × 1) → 2");
    assert_eq!(
        program.node(wrapped).arrow().fmt(types).to_string(),
        "(2 × 1) → (1 + 2)"
    );
}

#[test]
fn unconstrained_summand_is_unbound() {
    let (mut b, input) = with_input(|t| t.word(1));
    let iden = b.iden();
    let wrapped = b.injl(iden);
    b.comp(input, wrapped);
    let err = check(b).unwrap_err();
    // injl leaves its right summand free.
    assert_eq!(err, DecodeError::UnboundTypeVariable { node: 2 });
}

#[test]
fn lone_unit_is_ambiguous() {
    let mut b = ProgramBuilder::new();
    b.unit();
    assert_eq!(check(b).unwrap_err(), DecodeError::UnboundTypeVariable { node: 0 });
}

#[test]
fn case_splits_on_the_first_component() {
    let (mut b, input) = with_input(|t| {
        let u = t.unit();
        let bit = t.word(1);
        t.product(bit, u)
    });
    let left = b.unit();
    let right = b.unit();
    let branch = b.case(left, right);
    b.comp(input, branch);
    let program = check(b).unwrap();
    assert_eq!(program.type_arrow(), "1 → 1");
    assert_eq!(program.node(branch).arrow().fmt(program.types()).to_string(), "(2 × 1) → 1");
}

#[test]
fn mismatches_report_both_types() {
    let mut b = ProgramBuilder::new();
    let unit = b.unit();
    let iden = b.iden();
    let first = b.take(iden);
    b.comp(unit, first);
    match check(b).unwrap_err() {
        DecodeError::TypeMismatch { node, left, right } => {
            assert_eq!(node, 3);
            assert_eq!(left, "1");
            assert!(right.starts_with("(?") && right.contains(" × ?"), "{right}");
        }
        other => panic!("unexpected error {other}"),
    }
}

/// `((1 + 2) × (1 + 2)) × …`, nested `depth` times.
fn shared_product(types: &mut TypeTable, depth: usize) -> TypeRef {
    let unit = types.unit();
    let bit = types.sum(unit, unit);
    let mut ty = types.sum(unit, bit);
    for _ in 0..depth {
        ty = types.product(ty, ty);
    }
    ty
}

#[test]
fn deeply_shared_types_render_briefly() {
    let (b, _) = with_input(|types| shared_product(types, 48));
    let program = check(b).unwrap();
    let arrow = program.type_arrow();
    assert!(arrow.starts_with("1 → (((("), "{arrow}");
    assert!(arrow.ends_with('…'));
    assert!(arrow.len() <= RENDER_BUDGET + 16);

    let (mut b, input) = with_input(|types| shared_product(types, 48));
    let unit = b.unit();
    let split = b.case(unit, unit);
    b.comp(input, split);
    match check(b).unwrap_err() {
        DecodeError::TypeMismatch { left, right, .. } => {
            assert!(left.len() <= RENDER_BUDGET + 8, "{}", left.len());
            assert!(right.len() <= RENDER_BUDGET + 8, "{}", right.len());
            assert!(left.ends_with('…') || right.ends_with('…'));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn shared_nodes_have_one_arrow() {
    let build = |shared: bool| {
        let (mut b, input) = with_input(|t| {
            let u = t.unit();
            let bit = t.word(1);
            t.product(u, bit)
        });
        let iden = b.iden();
        let other = if shared { iden } else { b.iden() };
        let first = b.take(iden);
        let second = b.drop(other);
        let both = b.pair(first, second);
        b.comp(input, both);
        check(b)
    };

    let unshared = build(false).unwrap();
    assert_eq!(unshared.type_arrow(), "1 → (1 × 2)");

    // One `iden` cannot be both `1 → 1` and `2 → 2`.
    let err = build(true).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.node(), Some(5));
}

#[test]
fn shared_node_is_seen_identically_by_both_parents() {
    let (mut b, input) = with_input(|t| t.word(8));
    let iden = b.iden();
    let dup = b.pair(iden, iden);
    let root = b.comp(input, dup);
    let program = check(b).unwrap();
    assert_eq!(program.type_arrow(), "1 → 2^16");
    let parent = program.node(root);
    assert_eq!(program.node(iden).arrow().fmt(program.types()).to_string(), "2^8 → 2^8");
    assert_eq!(program.node(input).arrow().target, program.node(iden).arrow().source);
    assert_eq!(parent.arrow(), program.arrow());
}

#[test]
fn cyclic_constraints_are_infinite_types() {
    let mut b = ProgramBuilder::new();
    let iden = b.iden();
    let left = b.injl(iden);
    b.comp(left, left);
    assert_eq!(check(b).unwrap_err(), DecodeError::InfiniteType { node: 0 });
}

#[test]
fn hidden_siblings_leave_the_middle_type_unknown() {
    let mut b = ProgramBuilder::new();
    let unit = b.types_mut().unit();
    let start = b.witness(unit, unit, vec![]);
    let first = b.hidden(Cmr::from_byte_array([1; 32]));
    let second = b.hidden(Cmr::from_byte_array([2; 32]));
    let pruned = b.comp(first, second);
    let prefix = b.comp(start, pruned);
    let end = b.witness(unit, unit, vec![]);
    b.comp(prefix, end);
    assert_eq!(
        check(b).unwrap_err(),
        DecodeError::UnrecognizedHiddenPruning { node: 1 }
    );
}

#[test]
fn hidden_branch_typed_by_its_context() {
    let (mut b, input) = with_input(|t| {
        let u = t.unit();
        let bit = t.word(1);
        t.product(bit, u)
    });
    let kept = b.unit();
    let pruned = b.hidden(Cmr::from_byte_array([9; 32]));
    let branch = b.case(kept, pruned);
    b.comp(input, branch);
    let program = check(b).unwrap();
    assert!(program.is_redeem());
    assert_eq!(
        program.node(pruned).arrow().fmt(program.types()).to_string(),
        "(1 × 1) → 1"
    );
}

#[test]
fn disconnect_threads_a_hash_through_its_left_branch() {
    let mut b = ProgramBuilder::new();
    let unit = b.types_mut().unit();
    let bit = b.types_mut().word(1);
    let hash = b.types_mut().word(256);
    let source = b.types_mut().product(hash, unit);
    let target = b.types_mut().product(unit, bit);
    let left = b.witness(source, target, vec![]);
    let right = b.iden();
    b.disconnect(left, right);
    let program = check(b).unwrap();
    assert_eq!(program.type_arrow(), "1 → (1 × 2)");
}

#[test]
fn jets_are_typed_by_their_descriptors() {
    let mut b = ProgramBuilder::new();
    let unit = b.types_mut().unit();
    let word = b.types_mut().word(32);
    let input = b.witness(unit, word, vec![1, 2, 3, 4]);
    let check_height = b.jet_by_name(JetSet::Elements, "check_lock_height").unwrap();
    b.comp(input, check_height);
    let program = check(b).unwrap();
    assert_eq!(program.type_arrow(), "1 → 1");

    let mut b = ProgramBuilder::new();
    let unit = b.types_mut().unit();
    let word = b.types_mut().word(64);
    let input = b.witness(unit, word, vec![]);
    let check_height = b.jet_by_name(JetSet::Elements, "check_lock_height").unwrap();
    b.comp(input, check_height);
    let err = check(b).unwrap_err();
    assert!(err.is_type_mismatch(), "{err}");
}
