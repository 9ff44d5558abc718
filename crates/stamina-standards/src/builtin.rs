//! Built-in family rules.

use stamina_model::FamilyCode;

use crate::family::{
    CompositeRange, DepthRule, FamilyRule, HistoricalRule, LevelDescriptor, ParentRule,
    VersionQualifier, VersionSelector,
};
use crate::sections::SectionTable;

/// Name of the NACE Rev. 2 division table shared by its refinements.
pub const NACE_SECTIONS: &str = "NACE";
/// Name of the table giving subsections for NACE 1.x and CPA 2002 divisions.
pub const NACE_SUBSECTIONS: &str = "NACEX";
/// Name of the ISIC division table, loaded from its structure source.
pub const ISIC_SECTIONS: &str = "ISIC";

/// Section letter of each NACE Rev. 2 division, division 01 first.
/// `X` marks unused division numbers.
const NACE_DIVISION_SECTIONS: &str = "AAAXBBBBBCCCCCCCCCCCCCCCCCCCCCCCCXDEEEEXFFFXGGGXHHHHHXIIXJJJJJJKKKXLMMMMMMMXNNNNNNXOPQQQXRRRRSSSTTU";

pub fn nace_section_table() -> SectionTable {
    SectionTable::from_converter(NACE_DIVISION_SECTIONS, 'X')
}

fn family(code: &'static str) -> FamilyCode {
    FamilyCode::from_static(code)
}

fn levels(specs: &[(&str, &str)]) -> Vec<LevelDescriptor> {
    specs
        .iter()
        .map(|(name, pattern)| LevelDescriptor::new(name, pattern))
        .collect()
}

fn names(long: &str, short: &str) -> (Option<String>, Option<String>) {
    (Some(long.to_string()), Some(short.to_string()))
}

fn section_lookup(table: &str) -> ParentRule {
    ParentRule::SectionLookup {
        table: table.to_string(),
    }
}

const NACE_LEVELS: [(&str, &str); 4] = [
    ("section", "[A-U]"),
    ("division", "[0-9]{2}"),
    ("group", "[0-9]{2}\\.[0-9]"),
    ("class", "[0-9]{2}\\.[0-9]{2}"),
];

const NACE_HISTORICAL_LEVELS: [(&str, &str); 5] = [
    ("section", "[A-Q]"),
    ("subsection", "[A-Q][A-Z]"),
    ("division", "[0-9]{2}"),
    ("group", "[0-9]{2}\\.[0-9]"),
    ("class", "[0-9]{2}\\.[0-9]{2}"),
];

const CPA_LEVELS: [(&str, &str); 6] = [
    ("section", "[A-U]"),
    ("division", "[0-9]{2}"),
    ("group", "[0-9]{2}\\.[0-9]"),
    ("class", "[0-9]{2}\\.[0-9]{2}"),
    ("category", "[0-9]{2}\\.[0-9]{2}\\.[0-9]"),
    ("subcategory", "[0-9]{2}\\.[0-9]{2}\\.[0-9]{2}"),
];

const CPA_HISTORICAL_LEVELS: [(&str, &str); 7] = [
    ("section", "[A-Q]"),
    ("subsection", "[A-Q][A-Z]"),
    ("division", "[0-9]{2}"),
    ("group", "[0-9]{2}\\.[0-9]"),
    ("class", "[0-9]{2}\\.[0-9]{2}"),
    ("category", "[0-9]{2}\\.[0-9]{2}\\.[0-9]"),
    ("subcategory", "[0-9]{2}\\.[0-9]{2}\\.[0-9]{2}"),
];

fn rule(
    code: &'static str,
    qualifier: VersionQualifier,
    level_specs: &[(&str, &str)],
    depth: DepthRule,
    parent: ParentRule,
    (long_name, short_name): (Option<String>, Option<String>),
) -> FamilyRule {
    FamilyRule {
        family: family(code),
        qualifier,
        levels: levels(level_specs),
        depth,
        parent,
        long_name,
        short_name,
        historical: None,
        strip_section_prefix: false,
    }
}

/// Every family known out of the box.
pub fn builtin_families() -> Vec<FamilyRule> {
    let mut nace = rule(
        "NACE",
        VersionQualifier::Revision,
        &NACE_LEVELS,
        DepthRule::Stripped,
        section_lookup(NACE_SECTIONS),
        names(
            "Statistical Classification of Economic Activities in the European Community, Rev. %s",
            "NACE Rev. %s",
        ),
    );
    nace.historical = Some(HistoricalRule {
        selector: VersionSelector::Major(1),
        levels: levels(&NACE_HISTORICAL_LEVELS),
        parent: section_lookup(NACE_SUBSECTIONS),
        digit_offset: 1,
    });

    let mut cpa = rule(
        "CPA",
        VersionQualifier::Version,
        &CPA_LEVELS,
        DepthRule::Stripped,
        section_lookup(NACE_SECTIONS),
        names(
            "Statistical Classification of Products by Activity, Version %s",
            "CPA %s",
        ),
    );
    cpa.historical = Some(HistoricalRule {
        selector: VersionSelector::YearUpTo(2002),
        levels: levels(&CPA_HISTORICAL_LEVELS),
        parent: section_lookup(NACE_SUBSECTIONS),
        digit_offset: 1,
    });

    vec![
        rule(
            "ISIC",
            VersionQualifier::Revision,
            &[
                ("section", "[A-U]"),
                ("division", "[0-9]{2}"),
                ("group", "[0-9]{3}"),
                ("class", "[0-9]{4}"),
            ],
            DepthRule::Stripped,
            section_lookup(ISIC_SECTIONS),
            names(
                "International Standard Industrial Classification of All Economic Activities, Rev.%s",
                "ISIC Rev.%s",
            ),
        ),
        rule(
            "CPC",
            VersionQualifier::Version,
            &[
                ("section", "[0-9]"),
                ("division", "[0-9]{2}"),
                ("group", "[0-9]{3}"),
                ("class", "[0-9]{4}"),
                ("subclass", "[0-9]{5}"),
            ],
            DepthRule::Stripped,
            ParentRule::Truncate,
            names("Central Product Classification, Ver.%s", "CPC Ver.%s"),
        ),
        nace,
        cpa,
        rule(
            "NAF",
            VersionQualifier::Revision,
            &[
                ("section", "[A-U]"),
                ("division", "[0-9]{2}"),
                ("group", "[0-9]{2}\\.[0-9]"),
                ("class", "[0-9]{2}\\.[0-9]{2}"),
                ("subclass", "[0-9]{2}\\.[0-9]{2}[A-Z]"),
            ],
            DepthRule::Stripped,
            section_lookup(NACE_SECTIONS),
            names(
                "Nomenclature d'activités française - NAF rév. %s",
                "NAF rév. %s",
            ),
        ),
        rule(
            "CPF",
            VersionQualifier::Revision,
            &CPA_LEVELS,
            DepthRule::Stripped,
            section_lookup(NACE_SECTIONS),
            names(
                "Classification des produits française - CPF rév. %s",
                "CPF rév. %s",
            ),
        ),
        rule(
            "ATECO",
            VersionQualifier::None,
            &CPA_LEVELS,
            DepthRule::Stripped,
            section_lookup(NACE_SECTIONS),
            names(
                "Classificazione delle attività economiche ATECO %s",
                "ATECO %s",
            ),
        ),
        rule(
            "NAICS",
            VersionQualifier::None,
            &[
                ("sector", "[1-9]{2}"),
                ("subsector", "[1-9]{3}"),
                ("group", "[1-9]{4}"),
                ("naics-industry", "[1-9]{5}"),
                ("national-industry", "[1-9]{5}[0-9]"),
            ],
            DepthRule::Composite,
            ParentRule::Composite {
                ranges: vec![
                    CompositeRange::new("31-33", &["3"]),
                    CompositeRange::new("44-45", &["44", "45"]),
                    CompositeRange::new("48-49", &["48", "49"]),
                ],
            },
            names(
                "North American Industry Classification System %s",
                "NAICS %s",
            ),
        ),
        rule(
            "SIC",
            VersionQualifier::None,
            &[
                ("section", "[A-U]"),
                ("division", "[0-9]{2}"),
                ("group", "[0-9]{2}\\.[0-9]"),
                ("class", "[0-9]{2}\\.[0-9]{2}"),
                ("subclass", "[0-9]{2}\\.[0-9]{2}\\/[0-9]"),
            ],
            DepthRule::Shape(vec![(1, 1), (2, 2), (4, 3), (5, 4), (7, 5)]),
            section_lookup(NACE_SECTIONS),
            names(
                "UK Standard Industrial Classification of Economic Activities %s",
                "SIC %s",
            ),
        ),
        rule(
            "SBI",
            VersionQualifier::None,
            &[
                ("section", "[A-U]"),
                ("division", "[1-9]{2}"),
                ("group", "[1-9]{3}"),
                ("class", "[1-9]{4}"),
                ("subclass", "[1-9]{5}"),
            ],
            DepthRule::Stripped,
            section_lookup(NACE_SECTIONS),
            names("Standaard Bedrijfsindeling %s", "SBI %s"),
        ),
        rule(
            "SKD",
            VersionQualifier::None,
            &[
                ("section", "[A-U]"),
                ("division", "[0-9]{2}"),
                ("group", "[0-9]{2}\\.[0-9]"),
                ("class", "[0-9]{2}\\.[0-9]{2}"),
                ("subclass", "[0-9]{2}\\.[0-9]{3}"),
            ],
            DepthRule::Stripped,
            section_lookup(NACE_SECTIONS),
            names("Standardna klasifikacija dejavnosti %s", "SKD %s"),
        ),
        FamilyRule {
            family: family("HS"),
            qualifier: VersionQualifier::None,
            levels: vec![
                LevelDescriptor::new("chapter", "[0-9]{2}").with_notation("AG2"),
                LevelDescriptor::new("heading", "[0-9]{4}").with_notation("AG4"),
                LevelDescriptor::new("subheading", "[0-9]{6}").with_notation("AG6"),
            ],
            depth: DepthRule::Paired,
            parent: ParentRule::Explicit,
            long_name: Some(
                "Harmonized Commodity Description and Coding System, version %s".to_string(),
            ),
            short_name: Some("HS %s".to_string()),
            historical: None,
            strip_section_prefix: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nace_table_covers_known_divisions() {
        let table = nace_section_table();
        assert_eq!(table.section_for("01"), Some("A"));
        assert_eq!(table.section_for("03"), Some("A"));
        assert_eq!(table.section_for("04"), None);
        assert_eq!(table.section_for("45"), Some("G"));
        assert_eq!(table.section_for("99"), Some("U"));
    }

    #[test]
    fn builtin_families_are_unique() {
        let families = builtin_families();
        let mut codes: Vec<&str> = families.iter().map(|f| f.family.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), families.len());
    }
}
