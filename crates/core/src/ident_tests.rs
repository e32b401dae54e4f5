// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashSet;

#[test]
fn user_zone_is_not_the_special_zone_of_the_same_name() {
    let user = Ident::zone("ANY");
    assert_ne!(user, Ident::ANY);
    assert_eq!(user.name(), Ident::ANY.name());

    let mut set = HashSet::new();
    set.insert(user.clone());
    set.insert(Ident::ANY);
    assert_eq!(set.len(), 2);
}

#[test]
fn built_in_zones_are_ordinary_zones() {
    assert_eq!(Ident::zone_public(), Ident::zone("public"));
    assert_eq!(Ident::zone_external(), Ident::zone("external"));
    assert_eq!(Ident::zone_block(), Ident::zone("block"));

    assert!(Ident::zone_public().is_zone());
    assert!(!Ident::zone_public().is_special_zone());
    assert_eq!(Ident::zone_block().name(), "block");
}

#[test]
fn zone_and_policy_of_same_name_differ() {
    assert_ne!(Ident::zone("work"), Ident::policy("work"));
}

#[test]
fn ordering_groups_by_kind() {
    let zone_policy = Ident::zone_policy("public", Direction::To, SpecialZone::Host);
    let mut idents = vec![
        zone_policy.clone(),
        Ident::policy("allow-dns"),
        Ident::zone("public"),
        Ident::HOST,
    ];
    idents.sort();

    assert_eq!(
        idents,
        vec![
            Ident::HOST,
            Ident::zone("public"),
            Ident::policy("allow-dns"),
            zone_policy,
        ]
    );
}

#[test]
fn names_follow_entity_kind() {
    assert_eq!(Ident::zone("public").name(), "public");
    assert_eq!(Ident::policy("allow-dns").name(), "allow-dns");
    assert_eq!(Ident::ANY.name(), "ANY");
    assert_eq!(Ident::HOST.name(), "HOST");
}

#[test]
fn zone_policy_name_uses_its_endpoints() {
    let to_host = Ident::zone_policy("public", Direction::To, SpecialZone::Host);
    assert_eq!(to_host.endpoints(), Some(("public", "HOST")));
    assert_eq!(to_host.name(), "zone_public_HOST");

    let from_any = Ident::zone_policy("public", Direction::From, SpecialZone::Any);
    assert_eq!(from_any.endpoints(), Some(("ANY", "public")));
    assert_eq!(from_any.name(), "zone_ANY_public");
}

#[test]
fn zone_policies_enumerates_all_four_directions() {
    let policies: Vec<Ident> = Ident::zone_policies("public").collect();
    assert_eq!(policies.len(), 4);
    assert!(policies.iter().all(Ident::is_zone_policy));

    let unique: HashSet<&Ident> = policies.iter().collect();
    assert_eq!(unique.len(), 4);
}

#[test]
fn kind_predicates() {
    assert!(Ident::zone("public").is_zone());
    assert!(Ident::zone("public").is_any_zone());
    assert!(Ident::ANY.is_special_zone());
    assert!(Ident::ANY.is_any_zone());
    assert!(!Ident::ANY.is_zone());

    let zone_policy = Ident::zone_policy("public", Direction::To, SpecialZone::Any);
    assert!(zone_policy.is_zone_policy());
    assert!(zone_policy.is_any_policy());
    assert!(!zone_policy.is_any_zone());
    assert!(Ident::policy("p").is_any_policy());
}

#[test]
fn display_mirrors_kind_and_name() {
    assert_eq!(Ident::zone("public").to_string(), "Zone(public)");
    assert_eq!(Ident::policy("p1").to_string(), "Policy(p1)");
    assert_eq!(Ident::HOST.to_string(), "SpecialZone(HOST)");
    assert_eq!(
        Ident::zone_policy("public", Direction::From, SpecialZone::Any).to_string(),
        "ZonePolicy(public from ANY)"
    );
}

#[test]
fn serialized_form_carries_the_kind() {
    let json = serde_json::to_string(&Ident::zone("public")).unwrap();
    assert_eq!(json, r#"{"Zone":"public"}"#);

    let json = serde_json::to_string(&Ident::ANY).unwrap();
    assert_eq!(json, r#"{"Special":"Any"}"#);
}
