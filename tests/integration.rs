use std::collections::HashSet;

use columnar_masks::{
    Column, ColumnMasks, Comparator, FilterPredicate, FrameError, JoinOptions, JoinType, Table,
    TableMasks, Value, percentile,
};

fn one_to_ten() -> Table {
    Table::new()
        .with_column("x", (1..=10).collect::<Vec<i64>>())
        .unwrap()
        .with_column(
            "name",
            vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"],
        )
        .unwrap()
}

fn xs(table: &Table) -> Vec<i64> {
    table
        .get_col("x")
        .unwrap()
        .values()
        .into_iter()
        .map(|v| match v {
            Value::Int(i) => i,
            other => panic!("unexpected value {other:?}"),
        })
        .collect()
}

fn row_set(table: &Table) -> HashSet<Vec<Value>> {
    (0..table.len()).filter_map(|i| table.row(i)).collect()
}

#[test]
fn test_complementary_masks_rebuild_table() {
    let t = one_to_ten();
    for v in [0i64, 1, 5, 10, 11] {
        let v = Value::Int(v);
        let ge = t.ge_mask("x", &v).unwrap();
        let lt = t.lt_mask("x", &v).unwrap();
        assert_eq!(ge.len() + lt.len(), t.len());

        let mut union = row_set(&ge);
        union.extend(row_set(&lt));
        assert_eq!(union, row_set(&t));

        let rebuilt = t
            .mixbool_mask(&["x", "x"], &[Comparator::Ge, Comparator::Lt], &[v.clone(), v])
            .unwrap();
        assert_eq!(rebuilt, t);
    }
}

#[test]
fn test_eq_mask_selects_exactly_matching_rows() {
    let t = Table::new()
        .with_column("k", vec![1i64, 2, 1, 3, 1])
        .unwrap()
        .with_column("v", vec![10.0, 20.0, 30.0, 40.0, 50.0])
        .unwrap();
    let out = t.eq_mask("k", &Value::Int(1)).unwrap();
    assert_eq!(out.len(), 3);
    assert!(
        out.get_col("k")
            .unwrap()
            .values()
            .iter()
            .all(|v| *v == Value::Int(1))
    );
    assert_eq!(out.index(), &[Value::Int(0), Value::Int(2), Value::Int(4)]);
}

#[test]
fn test_in_eqmask_is_deduplicated_union() {
    let t = one_to_ten();
    let union = t.in_eqmask("x", &[Value::Int(7), Value::Int(2)]).unwrap();
    assert_eq!(xs(&union), vec![2, 7]);

    let mut expected = row_set(&t.eq_mask("x", &Value::Int(7)).unwrap());
    expected.extend(row_set(&t.eq_mask("x", &Value::Int(2)).unwrap()));
    assert_eq!(row_set(&union), expected);

    let same = t.in_eqmask("x", &[Value::Int(4), Value::Int(4)]).unwrap();
    assert_eq!(same, t.eq_mask("x", &Value::Int(4)).unwrap());
}

#[test]
fn test_union_drops_identical_rows() {
    let t = Table::new()
        .with_column("k", vec!["a", "a", "b"])
        .unwrap()
        .with_column("v", vec![1i64, 1, 2])
        .unwrap();
    let out = t.in_eqmask("k", &[Value::from("a"), Value::from("b")]).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out.index(), &[Value::Int(0), Value::Int(2)]);
}

#[test]
fn test_mix_eqmask() {
    let t = one_to_ten();
    let out = t
        .mix_eqmask(&["x", "name"], &[Value::Int(9), Value::from("c")])
        .unwrap();
    assert_eq!(xs(&out), vec![3, 9]);

    let err = t.mix_eqmask(&["x", "name"], &[Value::Int(9)]).unwrap_err();
    assert!(matches!(
        err,
        FrameError::LengthMismatch {
            expected: 2,
            actual: 1
        }
    ));
}

#[test]
fn test_mixbool_mask_from_tags() {
    let t = one_to_ten();
    let comparators = ["le", "gt"]
        .iter()
        .map(|tag| tag.parse::<Comparator>())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let out = t
        .mixbool_mask(&["x", "x"], &comparators, &[Value::Int(2), Value::Int(8)])
        .unwrap();
    assert_eq!(xs(&out), vec![1, 2, 9, 10]);

    assert!(matches!(
        "xx".parse::<Comparator>(),
        Err(FrameError::InvalidTag(tag)) if tag == "xx"
    ));
}

#[test]
fn test_between_inclusive_and_exclusive() {
    let t = one_to_ten();
    let (lo, hi) = (Value::Int(3), Value::Int(6));
    assert_eq!(xs(&t.bet_mask("x", (&lo, &hi), true).unwrap()), vec![3, 4, 5, 6]);
    assert_eq!(xs(&t.bet_mask("x", (&lo, &hi), false).unwrap()), vec![4, 5]);
}

#[test]
fn test_top_mask_example() {
    let t = one_to_ten();
    let threshold = percentile(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0], 80.0).unwrap();
    assert!((threshold - 8.2).abs() < 1e-9);
    assert_eq!(percentile(&[1.0, 2.0], 150.0), None);
    assert_eq!(xs(&t.top_mask("x", 20.0, true).unwrap()), vec![9, 10]);
}

#[test]
fn test_top_and_bottom_quartiles() {
    let t = Table::new()
        .with_column("x", vec![7i64, 3, 9, 1, 5, 8, 2, 6, 4, 10])
        .unwrap();
    let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
    let p25 = percentile(&values, 25.0).unwrap();
    let p75 = percentile(&values, 75.0).unwrap();

    let top = t.top_mask("x", 25.0, false).unwrap();
    assert!(xs(&top).iter().all(|&x| x as f64 >= p75));
    assert_eq!(xs(&top), vec![9, 8, 10]);

    let bottom = t.bot_mask("x", 25.0, true).unwrap();
    assert!(xs(&bottom).iter().all(|&x| x as f64 <= p25));
    assert_eq!(xs(&bottom), vec![1, 2, 3]);

    let overlap: HashSet<i64> = xs(&top).into_iter().collect();
    assert!(xs(&bottom).iter().all(|x| !overlap.contains(x)));
}

#[test]
fn test_top_and_bottom_overlap_only_at_boundary() {
    let t = Table::new().with_column("x", vec![5i64; 4]).unwrap();
    let top = t.top_mask("x", 25.0, false).unwrap();
    let bottom = t.bot_mask("x", 25.0, false).unwrap();
    assert_eq!(top.len(), 4);
    assert_eq!(bottom.len(), 4);
}

#[test]
fn test_mid_mask_inclusive_band() {
    let t = one_to_ten();
    // P25 = 3.25, P75 = 7.75
    assert_eq!(xs(&t.mid_mask("x", 50.0, false).unwrap()), vec![4, 5, 6, 7]);

    let full = t.mid_mask("x", 100.0, false).unwrap();
    assert_eq!(full, t);
}

#[test]
fn test_mid_mask_sort_flag_orders_by_key() {
    let t = Table::new()
        .with_column("x", vec![7i64, 3, 9, 1, 5, 8, 2, 6, 4, 10])
        .unwrap();
    assert_eq!(xs(&t.mid_mask("x", 50.0, false).unwrap()), vec![7, 5, 6, 4]);

    let sorted = t.mid_mask("x", 50.0, true).unwrap();
    assert_eq!(xs(&sorted), vec![4, 5, 6, 7]);
    assert_eq!(
        sorted.index(),
        &[Value::Int(8), Value::Int(4), Value::Int(7), Value::Int(0)]
    );
}

#[test]
fn test_with_index_rejects_wrong_length() {
    let err = one_to_ten()
        .with_index(vec![Value::Int(0), Value::Int(1)])
        .unwrap_err();
    assert!(matches!(
        err,
        FrameError::LengthMismatch {
            expected: 10,
            actual: 2
        }
    ));

    let err = Column::new(vec![1i64, 2, 3])
        .with_index(vec![Value::from("a")])
        .unwrap_err();
    assert!(matches!(err, FrameError::LengthMismatch { .. }));
}

#[test]
fn test_percentile_masks_skip_nulls() {
    let t = Table::new()
        .with_column("p", vec![Some(1.0), None, Some(2.0), Some(3.0)])
        .unwrap();
    let top = t.top_mask("p", 50.0, false).unwrap();
    assert_eq!(
        top.get_col("p").unwrap().values(),
        vec![Value::Float(2.0), Value::Float(3.0)]
    );
}

#[test]
fn test_dispatch_mask_rejects_unknown_mode() {
    assert!(matches!(
        FilterPredicate::parse("xx", vec![Value::Int(1)]),
        Err(FrameError::InvalidTag(tag)) if tag == "xx"
    ));

    let t = one_to_ten();
    let pred = FilterPredicate::parse("le", vec![Value::Int(2)]).unwrap();
    assert_eq!(xs(&t.mask("x", &pred).unwrap()), vec![1, 2]);
}

#[test]
fn test_column_masks() {
    let s = one_to_ten().column("x").unwrap();
    assert_eq!(s.gt_mask(&Value::Int(8)).unwrap().len(), 2);
    assert_eq!(s.mask(Comparator::Ne, &Value::Int(8)).unwrap().len(), 9);
    assert_eq!(s.name(), Some("x"));
}

#[test]
fn test_merge_column_into_table() {
    let t = one_to_ten();
    let y = Column::new((0..10).map(|i| i as f64 * 0.5).collect::<Vec<f64>>()).with_name("y");
    let merged = t.merge_column(&y, &JoinOptions::default()).unwrap();

    assert_eq!(merged.column_names(), &["x", "name", "y"]);
    assert_eq!(merged.len(), t.len());
    assert_eq!(merged.index(), t.index());
    assert_eq!(merged.row(4).unwrap()[2], Value::Float(2.0));
}

#[test]
fn test_merge_partial_column_inner_and_left() {
    let t = one_to_ten();
    let y = Column::new(vec![100i64, 200])
        .with_name("y")
        .with_index(vec![Value::Int(2), Value::Int(8)])
        .unwrap();

    let inner = t.merge_column(&y, &JoinOptions::default()).unwrap();
    assert_eq!(xs(&inner), vec![3, 9]);

    let left = t
        .merge_column(&y, &JoinOptions::default().how(JoinType::Left))
        .unwrap();
    assert_eq!(left.len(), 10);
    assert_eq!(left.row(0).unwrap()[2], Value::Null);
}

#[test]
fn test_merge_non_column_is_type_error() {
    let t = one_to_ten();
    let err = t.merge_column(one_to_ten(), &JoinOptions::default()).unwrap_err();
    assert!(matches!(err, FrameError::NotAColumn { columns: 2 }));

    let single = Table::new().with_column("y", vec![1i64; 10]).unwrap();
    let err = t.merge_column(&single, &JoinOptions::default()).unwrap_err();
    assert!(matches!(err, FrameError::NotAColumn { columns: 1 }));

    let s = t.column("x").unwrap();
    let err = s.merge_column(&t, &JoinOptions::default()).unwrap_err();
    assert!(matches!(err, FrameError::NotAColumn { .. }));
}

#[test]
fn test_merge_rejects_column_key_for_merged_side() {
    let t = one_to_ten();
    let y = Column::new(vec![1i64]).with_name("y");
    let err = t
        .merge_column(&y, &JoinOptions::default().right_on("y"))
        .unwrap_err();
    assert!(matches!(err, FrameError::IndexOnlyKey("right_on")));
}

#[test]
fn test_masks_never_modify_input() {
    let t = one_to_ten();
    let before = t.clone();
    let _ = t.top_mask("x", 30.0, true).unwrap();
    let _ = t.in_eqmask("name", &[Value::from("a")]).unwrap();
    let _ = t.merge_column(t.column("x").unwrap().with_name("x2"), &JoinOptions::default());
    assert_eq!(t, before);
}
