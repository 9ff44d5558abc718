#![allow(missing_docs)]

use proptest::prelude::*;

use stamina_model::ClassificationVersion;
use stamina_standards::{FamilyRegistry, NamingResolver};

fn version(family: &str, label: &str) -> ClassificationVersion {
    ClassificationVersion::parse(family, label).expect("version")
}

#[test]
fn scheme_and_level_identifiers() {
    let registry = FamilyRegistry::builtin();
    let naming = NamingResolver::new(&registry);

    let isic = version("ISIC", "4");
    assert_eq!(naming.context(&isic), "isicr4");
    assert_eq!(
        naming.scheme_id(&isic).as_str(),
        "http://stamina-project.org/codes/isicr4/isic"
    );
    assert_eq!(
        naming.level_id(&isic, 2).expect("level").as_str(),
        "http://stamina-project.org/codes/isicr4/divisions"
    );
    assert_eq!(
        naming.level_id(&isic, 4).expect("level").as_str(),
        "http://stamina-project.org/codes/isicr4/classes"
    );
    assert!(naming.level_id(&isic, 5).is_none());
    assert!(naming.level_id(&isic, 0).is_none());

    let cpc = version("CPC", "2.1");
    assert_eq!(naming.context(&cpc), "cpcv21");

    let naics = version("NAICS", "2012");
    assert_eq!(naming.context(&naics), "naics2012");
    assert_eq!(
        naming.level_id(&naics, 4).expect("level").as_str(),
        "http://stamina-project.org/codes/naics2012/naics-industries"
    );
}

#[test]
fn item_identifiers_follow_the_level_of_the_code() {
    let registry = FamilyRegistry::builtin();
    let naming = NamingResolver::new(&registry);

    let isic = version("ISIC", "4");
    assert_eq!(
        naming.item_id(&isic, "0111").expect("item").as_str(),
        "http://stamina-project.org/codes/isicr4/class/0111"
    );
    assert_eq!(
        naming.item_id(&isic, "A").expect("item").as_str(),
        "http://stamina-project.org/codes/isicr4/section/A"
    );
    assert!(naming.item_id(&isic, "011111").is_none());

    let naics = version("NAICS", "2012");
    assert_eq!(
        naming.item_id(&naics, "31-33").expect("item").as_str(),
        "http://stamina-project.org/codes/naics2012/sector/31-33"
    );

    let sic = version("SIC", "2007");
    assert_eq!(
        naming.item_id(&sic, "01.11/1").expect("item").as_str(),
        "http://stamina-project.org/codes/sic2007/subclass/01.11/1"
    );
}

#[test]
fn historical_versions_use_subsection_levels() {
    let registry = FamilyRegistry::builtin();
    let naming = NamingResolver::new(&registry);

    let nace11 = version("NACE", "1.1");
    assert_eq!(
        naming.item_id(&nace11, "DA").expect("item").as_str(),
        "http://stamina-project.org/codes/nacer11/subsection/DA"
    );
    assert_eq!(
        naming.item_id(&nace11, "15").expect("item").as_str(),
        "http://stamina-project.org/codes/nacer11/division/15"
    );
    assert_eq!(
        naming.item_id(&nace11, "15.11").expect("item").as_str(),
        "http://stamina-project.org/codes/nacer11/class/15.11"
    );

    let cpa2002 = version("CPA", "2002");
    assert_eq!(
        naming.item_id(&cpa2002, "01.11.11").expect("item").as_str(),
        "http://stamina-project.org/codes/cpav2002/subcategory/01.11.11"
    );

    let cpa21 = version("CPA", "2.1");
    assert_eq!(
        naming.item_id(&cpa21, "01.11.11").expect("item").as_str(),
        "http://stamina-project.org/codes/cpav21/subcategory/01.11.11"
    );
    assert_eq!(
        naming.item_id(&cpa21, "01").expect("item").as_str(),
        "http://stamina-project.org/codes/cpav21/division/01"
    );
}

#[test]
fn correspondence_identifiers_are_order_sensitive() {
    let registry = FamilyRegistry::builtin();
    let naming = NamingResolver::new(&registry);
    let nace = version("NACE", "2");
    let cpa = version("CPA", "2.1");

    assert_eq!(
        naming.correspondence_id(&nace, &cpa).as_str(),
        "http://stamina-project.org/codes/nacer2-cpav21/correspondence"
    );
    assert_eq!(
        naming
            .association_id(&nace, &cpa, "01.11", "01.11.11")
            .as_str(),
        "http://stamina-project.org/codes/nacer2-cpav21/association/01.11-01.11.11"
    );
    assert_ne!(
        naming.correspondence_id(&nace, &cpa),
        naming.correspondence_id(&cpa, &nace)
    );
    assert_eq!(
        naming.correspondence_short_name(&nace, &cpa),
        "NACE Rev. 2 - CPA 2.1"
    );
}

#[test]
fn display_names_and_definitions() {
    let registry = FamilyRegistry::builtin();
    let naming = NamingResolver::new(&registry);
    let nace = version("NACE", "2");
    let naf = version("NAF", "2");
    let unknown = version("GSBPM", "5.1");

    assert_eq!(
        naming.long_name(&nace).as_deref(),
        Some("Statistical Classification of Economic Activities in the European Community, Rev. 2")
    );
    assert_eq!(naming.short_name(&naf).as_deref(), Some("NAF rév. 2"));
    assert_eq!(naming.long_name(&unknown), None);
    assert_eq!(naming.short_name(&unknown), None);
    assert_eq!(naming.display_name(&unknown), "GSBPM 5.1");

    assert_eq!(
        naming.level_label(&nace, 1).as_deref(),
        Some(
            "Statistical Classification of Economic Activities in the European Community, Rev. 2 - Section level"
        )
    );

    let definitions = naming.correspondence_definitions(&nace, &naf);
    assert_eq!(definitions[0].text, "Correspondence table from NACE Rev. 2 to NAF rév. 2");
    assert_eq!(definitions[0].language, "en");
    assert_eq!(
        definitions[1].text,
        "Table de correspondance entre la NACE Rev. 2 et la NAF rév. 2"
    );
}

#[test]
fn level_labels_of_a_historical_version() {
    let registry = FamilyRegistry::builtin();
    let naming = NamingResolver::new(&registry);
    let nace = version("NACE", "1.1");
    let labels: Vec<String> = (1..=5)
        .filter_map(|depth| naming.level_label(&nace, depth))
        .collect();
    insta::assert_snapshot!(labels.join("\n"), @r"
    Statistical Classification of Economic Activities in the European Community, Rev. 1.1 - Section level
    Statistical Classification of Economic Activities in the European Community, Rev. 1.1 - Subsection level
    Statistical Classification of Economic Activities in the European Community, Rev. 1.1 - Division level
    Statistical Classification of Economic Activities in the European Community, Rev. 1.1 - Group level
    Statistical Classification of Economic Activities in the European Community, Rev. 1.1 - Class level
    ");
}

#[test]
fn association_labels_mark_partial_sides() {
    let registry = FamilyRegistry::builtin();
    let naming = NamingResolver::new(&registry);
    let cpc2 = version("CPC", "2");
    let cpc21 = version("CPC", "2.1");
    assert_eq!(
        naming.association_label(&cpc2, &cpc21, "01111", "01111", (true, false)),
        "CPC Ver.2 01111(p) - CPC Ver.2.1 01111"
    );
}

#[test]
fn custom_base_uri_is_used_everywhere() {
    let registry = FamilyRegistry::builtin().with_base_uri("http://example.org/");
    let naming = NamingResolver::new(&registry);
    let cpc = version("CPC", "2.1");
    assert_eq!(
        naming.item_id(&cpc, "0").expect("item").as_str(),
        "http://example.org/cpcv21/section/0"
    );
}

proptest! {
    #[test]
    fn item_ids_are_injective_and_stable(a in "[0-9]{1,5}", b in "[0-9]{1,5}") {
        let registry = FamilyRegistry::builtin();
        let naming = NamingResolver::new(&registry);
        let cpc = version("CPC", "2.1");
        let id_a = naming.item_id(&cpc, &a).expect("classified");
        let id_b = naming.item_id(&cpc, &b).expect("classified");
        let again = naming.item_id(&cpc, &a);
        prop_assert_eq!(Some(&id_a), again.as_ref());
        prop_assert_eq!(a == b, id_a == id_b);
    }

    #[test]
    fn item_ids_differ_across_versions(code in "[0-9]{2}", major in 1u32..9, minor in 0u32..9) {
        let registry = FamilyRegistry::builtin();
        let naming = NamingResolver::new(&registry);
        let current = version("CPC", &format!("{major}.{minor}"));
        let next = version("CPC", &format!("{}.{minor}", major + 1));
        prop_assert_ne!(
            naming.item_id(&current, &code),
            naming.item_id(&next, &code)
        );
    }
}
