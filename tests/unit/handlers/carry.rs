use super::*;
use crate::emit::ops::Op;

fn handles(ordinal: usize, names: &[&str]) -> Vec<Handle> {
    names.iter().map(|n| Handle::new(ordinal, n)).collect()
}

#[test]
fn fill_binds_in_code_and_in_state() {
    let mut code = SegmentCode::new(2);
    let members = handles(2, &["shaded_0", "label_0_0"]);
    let carry = CarryOver::default().fill(Slot::Figure, members.clone(), &mut code);

    assert_eq!(carry.get(Slot::Figure), Some(members.as_slice()));
    assert!(carry.is_live(Slot::Figure));
    assert!(!carry.is_live(Slot::Calc));
    assert_eq!(code.bound, vec![(Slot::Figure, members.clone())]);
    assert_eq!(
        code.ops(),
        &[Op::Bind {
            slot: Slot::Figure,
            members,
        }]
    );
}

#[test]
fn assembly_never_lives_in_the_carry() {
    let mut code = SegmentCode::new(5);
    let carry = CarryOver::default().fill(Slot::Assembly, handles(5, &["result"]), &mut code);
    assert!(carry.is_empty());
    assert!(!carry.is_live(Slot::Assembly));
    assert_eq!(code.bound.len(), 1);
}

#[test]
fn dispose_stale_fades_and_releases_a_live_slot() {
    let mut first = SegmentCode::new(1);
    let carry = CarryOver::default().fill(Slot::Highlight, handles(1, &["hl_0"]), &mut first);

    let mut code = SegmentCode::new(2);
    let carry = carry.dispose_stale(Slot::Highlight, &mut code);
    assert!(carry.is_empty());
    assert_eq!(code.disposed_slots, vec![Slot::Highlight]);
    assert_eq!(code.released, vec![Slot::Highlight]);
    assert!(matches!(code.ops()[0], Op::Comment(_)));
    assert!(matches!(code.ops().last(), Some(Op::Release(Slot::Highlight))));
}

#[test]
fn dispose_stale_is_silent_for_an_empty_slot() {
    let mut code = SegmentCode::new(1);
    let carry = CarryOver::default().dispose_stale(Slot::Figure, &mut code);
    assert_eq!(carry, CarryOver::default());
    assert!(code.ops().is_empty());
}

#[test]
fn take_empties_one_slot_only() {
    let mut code = SegmentCode::new(1);
    let mut carry = CarryOver::default()
        .fill(Slot::Figure, handles(1, &["a"]), &mut code)
        .fill(Slot::Calc, handles(1, &["b"]), &mut code);
    assert_eq!(carry.take(Slot::Calc), Some(handles(1, &["b"])));
    assert!(carry.is_live(Slot::Figure));
    assert_eq!(carry.take(Slot::Calc), None);
}
