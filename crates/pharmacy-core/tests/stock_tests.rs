//! Stock ledger integration tests through the public facade.

use std::sync::Arc;
use std::thread;

use pharmacy_core::{
    MedicineInput, NewStockRecord, PharmacyCore, PharmacyError, StockFilter, StockStatus,
    StockThresholds,
};

fn core_with_medicine(code: &str) -> (PharmacyCore, i64) {
    let core = PharmacyCore::open_in_memory().unwrap();
    let id = core
        .create_medicine(MedicineInput::new(code, format!("{} tablets", code)))
        .unwrap();
    (core, id)
}

#[test]
fn test_add_accumulates() {
    let (core, medicine_id) = core_with_medicine("VITC");
    core.create_stock_record(NewStockRecord::new(medicine_id, 10, 5, 100))
        .unwrap();

    let entry = core.add_stock(medicine_id, 5).unwrap();
    assert_eq!(entry.record.current_stock, 15);
    assert_eq!(entry.status, StockStatus::Normal);
    assert_eq!(entry.medicine.id, medicine_id);
}

#[test]
fn test_two_additions_sum_from_baseline() {
    let (core, medicine_id) = core_with_medicine("VITC");
    core.create_stock_record(NewStockRecord::new(medicine_id, 7, 5, 100))
        .unwrap();

    core.add_stock(medicine_id, 10).unwrap();
    let entry = core.add_stock(medicine_id, 5).unwrap();
    assert_eq!(entry.record.current_stock, 7 + 15);
}

#[test]
fn test_reduce_beyond_stock_fails_without_mutation() {
    let (core, medicine_id) = core_with_medicine("VITC");
    core.create_stock_record(NewStockRecord::new(medicine_id, 3, 1, 10))
        .unwrap();

    let err = core.reduce_stock(medicine_id, 5).unwrap_err();
    assert!(matches!(
        err,
        PharmacyError::Capacity {
            requested: 5,
            available: 3
        }
    ));

    let entry = core.get_stock_entry_for_medicine(medicine_id).unwrap();
    assert_eq!(entry.record.current_stock, 3);
}

#[test]
fn test_reduce_to_zero_is_out_of_stock() {
    let (core, medicine_id) = core_with_medicine("VITC");
    core.create_stock_record(NewStockRecord::new(medicine_id, 4, 1, 10))
        .unwrap();

    let entry = core.reduce_stock(medicine_id, 4).unwrap();
    assert_eq!(entry.record.current_stock, 0);
    assert_eq!(entry.status, StockStatus::OutOfStock);
}

#[test]
fn test_adjust_unknown_medicine_is_validation() {
    let core = PharmacyCore::open_in_memory().unwrap();
    assert!(matches!(
        core.add_stock(99, 1),
        Err(PharmacyError::Validation(_))
    ));
    assert!(matches!(
        core.reduce_stock(99, 1),
        Err(PharmacyError::Validation(_))
    ));
}

#[test]
fn test_add_overflow_is_validation() {
    let (core, medicine_id) = core_with_medicine("VITC");
    core.create_stock_record(NewStockRecord::new(medicine_id, i64::MAX - 1, 0, 10))
        .unwrap();

    let err = core.add_stock(medicine_id, 2).unwrap_err();
    assert!(matches!(err, PharmacyError::Validation(_)));
    assert_eq!(
        core.get_stock_entry_for_medicine(medicine_id)
            .unwrap()
            .record
            .current_stock,
        i64::MAX - 1
    );
}

#[test]
fn test_stats_with_huge_records_do_not_overflow() {
    let core = PharmacyCore::open_in_memory().unwrap();
    for code in ["BULK1", "BULK2"] {
        let id = core
            .create_medicine(MedicineInput::new(code, format!("{} pallet", code)))
            .unwrap();
        core.create_stock_record(NewStockRecord::new(id, i64::MAX - 1, 0, 10))
            .unwrap();
    }

    let stats = core.inventory_stats().unwrap();
    assert_eq!(stats.total_items, 2);
    assert_eq!(stats.full_items, 2);
    assert_eq!(stats.total_units, i64::MAX);
}

#[test]
fn test_invalid_thresholds_rejected() {
    let (core, medicine_id) = core_with_medicine("VITC");
    let err = core
        .create_stock_record(NewStockRecord::new(medicine_id, 0, 20, 10))
        .unwrap_err();
    assert!(matches!(err, PharmacyError::Validation(_)));

    let err = core
        .create_stock_record(NewStockRecord::new(medicine_id, -1, 0, 10))
        .unwrap_err();
    assert!(matches!(err, PharmacyError::Validation(_)));
}

#[test]
fn test_threshold_update_keeps_current_stock() {
    let (core, medicine_id) = core_with_medicine("VITC");
    let stock_id = core
        .create_stock_record(NewStockRecord::new(medicine_id, 8, 1, 100))
        .unwrap();

    core.update_stock_record(
        stock_id,
        StockThresholds {
            min_stock: 10,
            max_stock: 20,
            location: Some(" Shelf B ".into()),
            ..Default::default()
        },
    )
    .unwrap();

    let entry = core.get_stock_entry(stock_id).unwrap();
    assert_eq!(entry.record.current_stock, 8);
    assert_eq!(entry.record.location.as_deref(), Some("Shelf B"));
    assert_eq!(entry.status, StockStatus::LowStock);
}

#[test]
fn test_medicine_with_stock_cannot_be_deleted() {
    let (core, medicine_id) = core_with_medicine("VITC");
    let stock_id = core
        .create_stock_record(NewStockRecord::new(medicine_id, 1, 0, 10))
        .unwrap();

    assert!(matches!(
        core.delete_medicine(medicine_id),
        Err(PharmacyError::Conflict(_))
    ));

    assert!(core.delete_stock_record(stock_id).unwrap());
    assert!(core.delete_medicine(medicine_id).unwrap());
}

#[test]
fn test_views_and_stats() {
    let core = PharmacyCore::open_in_memory().unwrap();
    let levels = [("A", 0), ("B", 3), ("C", 20), ("D", 60)];
    for (code, current) in levels {
        let id = core
            .create_medicine(MedicineInput::new(code, format!("Medicine {}", code)))
            .unwrap();
        core.create_stock_record(NewStockRecord::new(id, current, 5, 50))
            .unwrap();
    }

    assert_eq!(core.list_in_stock().unwrap().len(), 3);

    let low = core
        .list_stock_entries(None, Some(StockFilter::LowStock))
        .unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].medicine.code, "B");

    let hits = core.list_stock_entries(Some("medicine d"), None).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].status, StockStatus::Full);

    let stats = core.inventory_stats().unwrap();
    assert_eq!(stats.total_items, 4);
    assert_eq!(stats.in_stock_items, 3);
    assert_eq!(stats.out_of_stock_items, 1);
    assert_eq!(stats.low_stock_items, 1);
    assert_eq!(stats.normal_items, 1);
    assert_eq!(stats.full_items, 1);
    assert_eq!(stats.total_units, 83);
}

#[test]
fn test_concurrent_reductions_never_go_negative() {
    let (core, medicine_id) = core_with_medicine("VITC");
    core.create_stock_record(NewStockRecord::new(medicine_id, 100, 10, 500))
        .unwrap();
    let core = Arc::new(core);

    // 8 threads x 20 attempts of 1 unit against 100 on hand.
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let core = Arc::clone(&core);
            thread::spawn(move || {
                let mut ok = 0;
                for _ in 0..20 {
                    match core.reduce_stock(medicine_id, 1) {
                        Ok(entry) => {
                            assert!(entry.record.current_stock >= 0);
                            ok += 1;
                        }
                        Err(PharmacyError::Capacity { .. }) => {}
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
                ok
            })
        })
        .collect();

    let succeeded: i64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(succeeded, 100);

    let entry = core.get_stock_entry_for_medicine(medicine_id).unwrap();
    assert_eq!(entry.record.current_stock, 0);
}
