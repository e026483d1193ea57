use super::{clamp_quantity, is_done, parse_quantity_entry, AllocationEngine, AllocationError};
use crate::domain::line_item::{LineItem, LineItemStore};
use crate::domain::types::{ItemRole, Multiplier};

// ==========================================
// 测试辅助函数
// ==========================================

fn line(id: &str, code: &str, qty: u64, role: ItemRole) -> LineItem {
    LineItem {
        unique_id: id.to_string(),
        opd: "OPD-100".to_string(),
        product_code: code.to_string(),
        description: format!("desc {}", code),
        zone: "A1".to_string(),
        quantity_requested: qty,
        role,
        in_scope: true,
        found: 0,
    }
}

fn part(id: &str, code: &str, qty: u64) -> LineItem {
    line(id, code, qty, ItemRole::Part)
}

fn kit(id: &str, code: &str, qty: u64) -> LineItem {
    line(id, code, qty, ItemRole::KitHeader)
}

fn child(id: &str, code: &str, qty: u64, parent: &str) -> LineItem {
    line(
        id,
        code,
        qty,
        ItemRole::KitChild {
            parent_id: parent.to_string(),
        },
    )
}

fn found_of(store: &LineItemStore, id: &str) -> u64 {
    store.get(id).map(|i| i.found).unwrap_or_default()
}

/// 单套件 + 两子件（6/4）
fn kit_fixture() -> LineItemStore {
    LineItemStore::from_items(vec![
        kit("K1", "KIT-A", 10),
        child("C1", "P-6", 6, "K1"),
        child("C2", "P-4", 4, "K1"),
    ])
}

// ==========================================
// 录入值解析
// ==========================================

#[test]
fn test_parse_quantity_entry() {
    assert_eq!(parse_quantity_entry("12"), 12);
    assert_eq!(parse_quantity_entry("  7"), 7);
    assert_eq!(parse_quantity_entry("12abc"), 12);
    assert_eq!(parse_quantity_entry("3.7"), 3);
    assert_eq!(parse_quantity_entry("-5"), -5);
    assert_eq!(parse_quantity_entry("+8"), 8);
    assert_eq!(parse_quantity_entry(""), 0);
    assert_eq!(parse_quantity_entry("abc"), 0);
    assert_eq!(parse_quantity_entry("-"), 0);
    assert_eq!(parse_quantity_entry("99999999999999999999999"), i64::MAX);
}

#[test]
fn test_clamp_quantity() {
    assert_eq!(clamp_quantity(-3, 10), 0);
    assert_eq!(clamp_quantity(0, 10), 0);
    assert_eq!(clamp_quantity(4, 10), 4);
    assert_eq!(clamp_quantity(40, 10), 10);
    assert_eq!(clamp_quantity(5, 0), 0);
}

#[test]
fn test_is_done_requires_positive_target() {
    assert!(is_done(4, 4));
    assert!(!is_done(3, 4));
    assert!(!is_done(0, 0));
}

// ==========================================
// 套件级录入
// ==========================================

#[test]
fn test_kit_partial_distributes_proportionally() {
    // 套件 10，子件 6/4，倍数 1，录入 5
    let engine = AllocationEngine::new();
    let out = engine
        .apply_kit_found(&kit_fixture(), "K1", 5, Multiplier::ONE)
        .unwrap();

    assert_eq!(found_of(&out, "K1"), 5);
    assert_eq!(found_of(&out, "C1"), 3); // floor(6*5/10)
    assert_eq!(found_of(&out, "C2"), 2); // floor(4*5/10)
}

#[test]
fn test_kit_entry_clamped_to_target() {
    let engine = AllocationEngine::new();
    let out = engine
        .apply_kit_found(&kit_fixture(), "K1", 999, Multiplier::new(2))
        .unwrap();

    assert_eq!(found_of(&out, "K1"), 20);
    assert_eq!(found_of(&out, "C1"), 12);
    assert_eq!(found_of(&out, "C2"), 8);

    let out = engine
        .apply_kit_found(&out, "K1", -4, Multiplier::new(2))
        .unwrap();
    assert_eq!(found_of(&out, "K1"), 0);
    assert_eq!(found_of(&out, "C1"), 0);
}

#[test]
fn test_kit_entry_leaves_other_rows_untouched() {
    let mut items = kit_fixture().into_items();
    let mut loose = part("P1", "P-6", 3);
    loose.found = 2;
    items.push(loose);
    items.push(kit("K2", "KIT-B", 1));
    items.push(child("C3", "P-6", 5, "K2"));
    let store = LineItemStore::from_items(items);

    let out = AllocationEngine::new()
        .apply_kit_found(&store, "K1", 10, Multiplier::ONE)
        .unwrap();

    assert_eq!(found_of(&out, "P1"), 2);
    assert_eq!(found_of(&out, "K2"), 0);
    assert_eq!(found_of(&out, "C3"), 0);
    assert_eq!(found_of(&out, "C1"), 6);
}

#[test]
fn test_kit_with_zero_target_short_circuits() {
    let store = LineItemStore::from_items(vec![kit("K0", "KIT-0", 0), child("C0", "X", 3, "K0")]);
    let out = AllocationEngine::new()
        .apply_kit_found(&store, "K0", 7, Multiplier::new(3))
        .unwrap();
    assert_eq!(found_of(&out, "K0"), 0);
    assert_eq!(found_of(&out, "C0"), 0);
}

#[test]
fn test_kit_unknown_or_not_a_kit() {
    let engine = AllocationEngine::new();
    let store = kit_fixture();
    assert_eq!(
        engine.apply_kit_found(&store, "NOPE", 1, Multiplier::ONE),
        Err(AllocationError::UnknownKit("NOPE".to_string()))
    );
    // 子件 id 不是套件
    assert!(matches!(
        engine.apply_kit_found(&store, "C1", 1, Multiplier::ONE),
        Err(AllocationError::UnknownKit(_))
    ));
}

#[test]
fn test_kit_children_never_exceed_kit_fraction() {
    // 各倍数、各录入值下: 每个子件 = floor(子件目标 × 套件found / 套件目标)
    let engine = AllocationEngine::new();
    let store = LineItemStore::from_items(vec![
        kit("K", "KIT", 7),
        child("A", "PA", 3, "K"),
        child("B", "PB", 5, "K"),
        child("C", "PC", 1, "K"),
    ]);

    for m in 1..=4u32 {
        let multiplier = Multiplier::new(m);
        let kit_target = 7 * u64::from(m);
        for v in 0..=kit_target as i64 {
            let out = engine.apply_kit_found(&store, "K", v, multiplier).unwrap();
            let kit_found = found_of(&out, "K");
            assert_eq!(kit_found, v as u64);
            for (id, base) in [("A", 3u64), ("B", 5), ("C", 1)] {
                let child_target = base * u64::from(m);
                assert_eq!(found_of(&out, id), child_target * kit_found / kit_target);
                assert!(found_of(&out, id) <= child_target);
            }
        }
    }
}

// ==========================================
// 零件汇总级录入
// ==========================================

#[test]
fn test_part_greedy_fill_in_row_order() {
    // 两条重复行 3/5，倍数 2（目标 6/10，合计 16），录入 12
    let store = LineItemStore::from_items(vec![part("R1", "X", 3), part("R2", "X", 5)]);
    let out = AllocationEngine::new()
        .apply_part_found(&store, "X", 12, Multiplier::new(2))
        .unwrap();

    assert_eq!(found_of(&out, "R1"), 6);
    assert_eq!(found_of(&out, "R2"), 6);
}

#[test]
fn test_part_group_sum_matches_clamped_entry() {
    let engine = AllocationEngine::new();
    let store = LineItemStore::from_items(vec![
        part("R1", "X", 2),
        part("Z", "Y", 9),
        part("R2", "X", 0),
        part("R3", "X", 4),
    ]);

    for m in 1..=3u32 {
        let multiplier = Multiplier::new(m);
        let total_target = 6 * u64::from(m);
        for v in -2..=(total_target as i64 + 5) {
            let out = engine.apply_part_found(&store, "X", v, multiplier).unwrap();
            let sum: u64 = ["R1", "R2", "R3"].iter().map(|id| found_of(&out, id)).sum();
            assert_eq!(sum, clamp_quantity(v, total_target));
            for id in ["R1", "R2", "R3"] {
                let row = out.get(id).unwrap();
                assert!(row.found <= row.target(multiplier));
            }
            assert_eq!(found_of(&out, "Z"), 0);
        }
    }
}

#[test]
fn test_part_entry_above_target_equals_target() {
    let engine = AllocationEngine::new();
    let store = LineItemStore::from_items(vec![part("R1", "X", 3), part("R2", "X", 5)]);
    let m = Multiplier::new(2);

    let at_target = engine.apply_part_found(&store, "X", 16, m).unwrap();
    for v in [17, 100, i64::MAX] {
        let above = engine.apply_part_found(&store, "X", v, m).unwrap();
        assert_eq!(above, at_target);
    }
}

#[test]
fn test_allocation_is_idempotent() {
    let engine = AllocationEngine::new();
    let mut items = kit_fixture().into_items();
    items.push(part("R1", "P-6", 2));
    items.push(part("R2", "P-6", 2));
    let store = LineItemStore::from_items(items);
    let m = Multiplier::new(3);

    let once = engine.apply_part_found(&store, "P-6", 7, m).unwrap();
    let twice = engine.apply_part_found(&once, "P-6", 7, m).unwrap();
    assert_eq!(once, twice);

    let once = engine.apply_kit_found(&store, "K1", 13, m).unwrap();
    let twice = engine.apply_kit_found(&once, "K1", 13, m).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_part_entry_excludes_kit_children() {
    // 子件与普通零件同编码: 零件录入只改普通零件
    let mut items = kit_fixture().into_items();
    items.push(part("R1", "P-6", 2));
    let store = LineItemStore::from_items(items);

    let out = AllocationEngine::new()
        .apply_part_found(&store, "P-6", 50, Multiplier::ONE)
        .unwrap();

    assert_eq!(found_of(&out, "R1"), 2);
    assert_eq!(found_of(&out, "C1"), 0);
}

#[test]
fn test_part_entry_settles_kits_all_or_nothing() {
    let engine = AllocationEngine::new();
    let m = Multiplier::ONE;

    // 子件全部满额 → 套件满额
    let full = engine.apply_kit_found(&kit_fixture(), "K1", 10, m).unwrap();
    let mut items = full.into_items();
    items.push(part("R1", "LOOSE", 1));
    let store = LineItemStore::from_items(items);
    let out = engine.apply_part_found(&store, "LOOSE", 1, m).unwrap();
    assert_eq!(found_of(&out, "K1"), 10);

    // 子件部分完成 → 套件从零件侧驱动时归零
    let partial = engine.apply_kit_found(&store, "K1", 5, m).unwrap();
    assert_eq!(found_of(&partial, "K1"), 5);
    let out = engine.apply_part_found(&partial, "LOOSE", 0, m).unwrap();
    assert_eq!(found_of(&out, "K1"), 0);
    assert_eq!(found_of(&out, "C1"), 3);
    assert_eq!(found_of(&out, "C2"), 2);
}

#[test]
fn test_part_entry_leaves_childless_kit_untouched() {
    let engine = AllocationEngine::new();
    let store = LineItemStore::from_items(vec![kit("K9", "KIT-9", 4), part("R1", "X", 1)]);
    let store = engine.apply_kit_found(&store, "K9", 3, Multiplier::ONE).unwrap();
    let out = engine.apply_part_found(&store, "X", 1, Multiplier::ONE).unwrap();
    assert_eq!(found_of(&out, "K9"), 3);
}

#[test]
fn test_part_code_only_on_children_settles_without_change() {
    let engine = AllocationEngine::new();
    let out = engine
        .apply_part_found(&kit_fixture(), "P-4", 4, Multiplier::ONE)
        .unwrap();
    assert_eq!(found_of(&out, "C2"), 0);

    assert_eq!(
        engine.apply_part_found(&kit_fixture(), "KIT-A", 1, Multiplier::ONE),
        Err(AllocationError::UnknownProductCode("KIT-A".to_string()))
    );
}

// ==========================================
// 倍数变更（不自动重算已录入值）
// ==========================================

#[test]
fn test_multiplier_change_does_not_rescale_found() {
    let engine = AllocationEngine::new();
    let store = LineItemStore::from_items(vec![part("R1", "X", 4)]);
    let out = engine.apply_part_found(&store, "X", 3, Multiplier::ONE).unwrap();

    // 倍数改为 3 后，已录入值保持 3；目标变为 12
    let row = out.get("R1").unwrap();
    assert_eq!(row.found, 3);
    assert_eq!(row.target(Multiplier::new(3)), 12);

    // 下一次录入才按新倍数截断
    let out = engine.apply_part_found(&out, "X", 50, Multiplier::new(3)).unwrap();
    assert_eq!(found_of(&out, "R1"), 12);
}

// ==========================================
// 完成开关
// ==========================================

#[test]
fn test_toggle_part_and_kit() {
    let engine = AllocationEngine::new();
    let m = Multiplier::new(2);
    let store = LineItemStore::from_items(vec![part("R1", "X", 3), part("R2", "X", 5)]);

    let on = engine.toggle_part_done(&store, "X", m).unwrap();
    assert_eq!(found_of(&on, "R1"), 6);
    assert_eq!(found_of(&on, "R2"), 10);
    let off = engine.toggle_part_done(&on, "X", m).unwrap();
    assert_eq!(found_of(&off, "R1"), 0);
    assert_eq!(found_of(&off, "R2"), 0);

    let on = engine.toggle_kit_done(&kit_fixture(), "K1", m).unwrap();
    assert_eq!(found_of(&on, "K1"), 20);
    assert_eq!(found_of(&on, "C2"), 8);
    let off = engine.toggle_kit_done(&on, "K1", m).unwrap();
    assert_eq!(found_of(&off, "K1"), 0);
}
