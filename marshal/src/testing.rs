use ogm_registry::{Cardinality, Registry, RegistryBuilder};

/// Pet/Owner registry shared by the marshal tests.
pub(crate) fn pet_registry() -> Registry {
    let mut builder = RegistryBuilder::new();
    builder
        .add_type("Pet")
        .field("name", "")
        .field("name$ur", "")
        .field("breed", "")
        .edge("owner", "Owner", Cardinality::Single)
        .done()
        .unwrap();
    builder
        .add_type("Owner")
        .field("name", "")
        .reverse_edge("pets", "Pet", Cardinality::Multiple, "owner")
        .edge("friends", "Owner", Cardinality::Multiple)
        .done()
        .unwrap();
    builder.build().unwrap()
}
