//! Listings, function queries, caller query text and clearing.

use ogm_tests::prelude::*;

async fn seeded<'r>(registry: &'r Registry, store: &MemoryStore) -> GraphSession<'r> {
    init_tracing();
    let session = memory_session(registry, store).await.unwrap();
    for (name, breed, age) in [("Biggles", "Beagle", 3), ("Snowy", "Terrier", 1), ("Rex", "Terrier", 2)] {
        let mut pet = registry.instantiate("Pet").unwrap();
        pet.set_attr("name", name);
        pet.set_attr("breed", breed);
        pet.set_attr("age", age);
        session.create(&mut pet, false, None).await.unwrap();
    }
    let mut owner = registry.instantiate("Owner").unwrap();
    owner.set_attr("name", "Sam");
    session.create(&mut owner, false, None).await.unwrap();
    session
}

fn names(vertices: &[Vertex]) -> Vec<&str> {
    vertices.iter().filter_map(|v| v.str_attr("name")).collect()
}

// ========== TEST: all ==========
#[tokio::test]
async fn test_all_lists_one_type() {
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = seeded(&registry, &store).await;

    let pets = session.all("Pet", &QueryOptions::new(), None).await.unwrap();

    assert_eq!(pets.len(), 3);
    assert!(pets.iter().all(|p| p.type_name == "Pet"));
}

#[tokio::test]
async fn test_all_orders_and_pages() {
    // GIVEN three pets of ages 3, 1 and 2
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = seeded(&registry, &store).await;

    // WHEN they are listed by age, in both directions and paged
    let ascending = session
        .all("Pet", &QueryOptions::new().order_asc("age"), None)
        .await
        .unwrap();
    let descending = session
        .all("Pet", &QueryOptions::new().order_desc("age"), None)
        .await
        .unwrap();
    let page = session
        .all("Pet", &QueryOptions::new().order_asc("age").limit(1).offset(1), None)
        .await
        .unwrap();

    // THEN each listing honours the options
    assert_eq!(names(&ascending), vec!["Snowy", "Rex", "Biggles"]);
    assert_eq!(names(&descending), vec!["Biggles", "Rex", "Snowy"]);
    assert_eq!(names(&page), vec!["Rex"]);
}

#[tokio::test]
async fn test_all_clamps_the_limit_to_the_configured_maximum() {
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = seeded(&registry, &store).await;

    // zero means "no limit", bounded by max_limit
    let pets = session.all("Pet", &QueryOptions::new().limit(0), None).await.unwrap();

    assert_eq!(pets.len(), 3);
}

// ========== TEST: function queries ==========
#[tokio::test]
async fn test_query_with_function_filters_by_type() {
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = seeded(&registry, &store).await;

    let terriers = session
        .query_with_function("Pet", "eq(breed, \"Terrier\")", Some(1), None)
        .await
        .unwrap();
    let named_sam = session
        .query_with_function("Pet", "eq(name, \"Sam\")", None, None)
        .await
        .unwrap();

    assert_eq!(terriers.len(), 2);
    // the owner named Sam is not a Pet
    assert!(named_sam.is_empty());
}

#[tokio::test]
async fn test_first_returns_the_last_match() {
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = seeded(&registry, &store).await;

    let terrier = session
        .first("Pet", "eq(breed, \"Terrier\")", None, None)
        .await
        .unwrap()
        .unwrap();
    let nobody = session
        .first("Pet", "eq(breed, \"Poodle\")", None, None)
        .await
        .unwrap();

    assert_eq!(terrier.str_attr("name"), Some("Rex"));
    assert!(nobody.is_none());
}

// ========== TEST: caller query text ==========
#[tokio::test]
async fn test_query_substitutes_the_expansion_and_variables() {
    // GIVEN caller query text with the expansion token and a variable
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = seeded(&registry, &store).await;
    let text = "query vertex($breed: string) { vertex(func: eq(breed, $breed)) { %expand% } }";
    let vars = Vars::from([("$breed".to_string(), "Beagle".to_string())]);

    // WHEN it runs
    let found = session.query("Pet", text, &vars, Some(1), None).await.unwrap();

    // THEN the matching pet is built with its scalars
    assert_eq!(names(&found), vec!["Biggles"]);
    assert_eq!(found[0].str_attr("breed"), Some("Beagle"));
}

#[tokio::test]
async fn test_query_rejects_invalid_depth() {
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = seeded(&registry, &store).await;
    let before = store.attempts();

    let result = session
        .query("Pet", "{ vertex(func: type(Pet)) { %expand% } }", &Vars::new(), Some(0), None)
        .await;

    assert!(matches!(result, Err(SessionError::InvalidDepth(0))));
    assert_eq!(store.attempts(), before);
}

// ========== TEST: clear ==========
#[tokio::test]
async fn test_clear_one_type_keeps_the_others() {
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = seeded(&registry, &store).await;

    session.clear(Some("Pet")).await.unwrap();

    assert!(session.all("Pet", &QueryOptions::new(), None).await.unwrap().is_empty());
    assert_eq!(session.all("Owner", &QueryOptions::new(), None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_clear_everything_reapplies_the_schema() {
    // GIVEN a seeded store with an extra index registered on the session
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let mut session = seeded(&registry, &store).await;
    session.add_index("rating: int .");

    // WHEN the store is wiped
    session.clear(None).await.unwrap();

    // THEN no data is left and the accumulated schema is back in place
    assert_eq!(store.node_count(), 0);
    let schema = store.schema();
    assert!(schema.iter().any(|line| line == "rating: int ."));
    assert!(schema.iter().any(|line| line.starts_with("name: string @index(exact)")));
    assert!(schema.iter().any(|line| line.starts_with("type Pet {")));
}
