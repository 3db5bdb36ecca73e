//! Category integration tests through the public facade.

use pharmacy_core::{CategoryInput, MedicineInput, PharmacyCore, PharmacyError};

fn core() -> PharmacyCore {
    PharmacyCore::open_in_memory().unwrap()
}

#[test]
fn test_create_and_lookup_by_name() {
    let core = core();
    let id = core
        .create_category(CategoryInput::new("  Antibiotics "))
        .unwrap();

    let found = core.find_category_by_name("ANTIBIOTICS").unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.name, "Antibiotics");
    assert_eq!(core.get_category(id).unwrap(), found);

    assert!(matches!(
        core.find_category_by_name("Vitamins"),
        Err(PharmacyError::NotFound(_))
    ));
}

#[test]
fn test_duplicate_name_conflicts_ignoring_case() {
    let core = core();
    core.create_category(CategoryInput::new("Vitamins")).unwrap();
    let err = core
        .create_category(CategoryInput::new("VITAMINS"))
        .unwrap_err();
    assert!(matches!(err, PharmacyError::Conflict(_)));
    assert_eq!(core.list_categories().unwrap().len(), 1);
}

#[test]
fn test_blank_name_rejected() {
    let core = core();
    assert!(matches!(
        core.create_category(CategoryInput::new("   ")),
        Err(PharmacyError::Validation(_))
    ));
}

#[test]
fn test_search_by_partial_name() {
    let core = core();
    for name in ["Antibiotics", "Antihistamines", "Vitamins"] {
        core.create_category(CategoryInput::new(name)).unwrap();
    }
    let hits = core.search_categories("anti").unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|c| c.name.starts_with("Anti")));
}

#[test]
fn test_rename_onto_existing_name_conflicts() {
    let core = core();
    core.create_category(CategoryInput::new("Vitamins")).unwrap();
    let id = core.create_category(CategoryInput::new("Minerals")).unwrap();

    let err = core
        .update_category(id, CategoryInput::new("vitamins"))
        .unwrap_err();
    assert!(matches!(err, PharmacyError::Conflict(_)));

    assert!(matches!(
        core.update_category(404, CategoryInput::new("Other")),
        Err(PharmacyError::NotFound(_))
    ));
}

#[test]
fn test_medicine_links_to_category() {
    let core = core();
    let category_id = core.create_category(CategoryInput::new("Vitamins")).unwrap();

    let mut input = MedicineInput::new("VITC", "Vitamin C 500mg");
    input.category_id = Some(category_id);
    let medicine_id = core.create_medicine(input).unwrap();
    assert_eq!(
        core.get_medicine(medicine_id).unwrap().category_id,
        Some(category_id)
    );

    assert!(matches!(
        core.delete_category(category_id),
        Err(PharmacyError::Conflict(_))
    ));

    core.update_medicine(medicine_id, MedicineInput::new("VITC", "Vitamin C 500mg"))
        .unwrap();
    assert!(core.delete_category(category_id).unwrap());
    assert!(!core.delete_category(category_id).unwrap());
}

#[test]
fn test_unknown_category_rejected_on_medicine() {
    let core = core();
    let mut input = MedicineInput::new("VITC", "Vitamin C");
    input.category_id = Some(7);
    assert!(matches!(
        core.create_medicine(input),
        Err(PharmacyError::Validation(_))
    ));
    assert!(core.list_medicines().unwrap().is_empty());
}
