//! Naming convention mapping resource types to policy names.

use convert_case::{Case, Casing};

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
    "news",
    "metadata",
    "data",
];

// Singular words ending in `s` that the suffix rules would otherwise strip.
const SINGULAR: &[&str] = &[
    "abacus",
    "alias",
    "apparatus",
    "atlas",
    "bias",
    "bonus",
    "bus",
    "cactus",
    "campus",
    "canvas",
    "census",
    "chaos",
    "chorus",
    "circus",
    "corpus",
    "focus",
    "fungus",
    "gas",
    "genus",
    "lens",
    "minus",
    "nexus",
    "octopus",
    "plus",
    "radius",
    "status",
    "stimulus",
    "surplus",
    "syllabus",
    "virus",
    "walrus",
];

// Whole-word plurals whose singular is not derivable from a suffix.
const EXACT: &[(&str, &str)] = &[("axes", "axis"), ("testes", "testis")];

// Matched against the whole word or its tail, so `salesmen` becomes
// `salesman` and `minibuses` becomes `minibus`.
const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("oxen", "ox"),
    ("moves", "move"),
    ("movies", "movie"),
    ("shoes", "shoe"),
    ("sexes", "sex"),
    ("zombies", "zombie"),
    ("buses", "bus"),
    ("aliases", "alias"),
    ("statuses", "status"),
    ("addresses", "address"),
    ("octopuses", "octopus"),
    ("octopi", "octopus"),
    ("viruses", "virus"),
    ("viri", "virus"),
    ("crises", "crisis"),
    ("analyses", "analysis"),
    ("diagnoses", "diagnosis"),
    ("parentheses", "parenthesis"),
    ("synopses", "synopsis"),
    ("theses", "thesis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("quizzes", "quiz"),
];

// Ordered: the first matching suffix wins.
const SUFFIXES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("hives", "hive"),
    ("tives", "tive"),
    ("ives", "ife"),
    ("lves", "lf"),
    ("oes", "o"),
    ("sses", "ss"),
    ("xes", "x"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("ss", "ss"),
    ("is", "is"),
    ("s", ""),
];

/// Singularize an English word, lowercasing it. Words that are already
/// singular come back unchanged.
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) || SINGULAR.contains(&lower.as_str()) {
        return lower;
    }
    if let Some((_, singular)) = EXACT.iter().find(|(plural, _)| lower == *plural) {
        return (*singular).to_string();
    }
    if let Some(stem) = lower.strip_suffix("es") {
        if SINGULAR.contains(&stem) {
            return stem.to_string();
        }
    }
    for (plural, singular) in IRREGULAR {
        if lower == *singular {
            return lower;
        }
        if let Some(prefix) = lower.strip_suffix(plural) {
            return format!("{prefix}{singular}");
        }
    }
    for (suffix, replacement) in SUFFIXES {
        if let Some(stem) = lower.strip_suffix(suffix) {
            let singular = format!("{stem}{replacement}");
            if singular.is_empty() {
                break;
            }
            return singular;
        }
    }
    lower
}

/// Derive the policy name for `resource`: the last word is singularized,
/// the whole name is Pascal cased and `suffix` is appended.
///
/// `"sample"` and `"samples"` both yield `SamplePolicy`, `"line_items"`
/// yields `LineItemPolicy`.
pub fn policy_name(resource: &str, suffix: &str) -> String {
    let snake = resource.trim().to_case(Case::Snake);
    let singular = match snake.rsplit_once('_') {
        Some((head, last)) => format!("{head}_{}", singularize(last)),
        None => singularize(&snake),
    };
    format!("{}{suffix}", singular.to_case(Case::Pascal))
}

/// Render `resource` for messages, e.g. `line_item` as `Line Item`.
pub fn humanize(resource: &str) -> String {
    resource.trim().to_case(Case::Title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn it_derives_the_same_name_for_singular_and_plural() {
        assert_eq!(policy_name("sample", "Policy"), "SamplePolicy");
        assert_eq!(policy_name("samples", "Policy"), "SamplePolicy");
    }

    #[test]
    fn it_singularizes_only_the_last_word() {
        assert_eq!(policy_name("line_items", "Policy"), "LineItemPolicy");
        assert_eq!(policy_name("LineItems", "Policy"), "LineItemPolicy");
        assert_eq!(policy_name("business_addresses", "Policy"), "BusinessAddressPolicy");
    }

    #[test]
    fn it_applies_suffix_rules() {
        assert_eq!(singularize("companies"), "company");
        assert_eq!(singularize("branches"), "branch");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("wishes"), "wish");
        assert_eq!(singularize("knives"), "knife");
        assert_eq!(singularize("wolves"), "wolf");
        assert_eq!(singularize("buses"), "bus");
        assert_eq!(singularize("houses"), "house");
        assert_eq!(singularize("classes"), "class");
        assert_eq!(singularize("users"), "user");
    }

    #[test]
    fn it_leaves_singular_words_alone() {
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("class"), "class");
        assert_eq!(singularize("analysis"), "analysis");
        assert_eq!(singularize("person"), "person");
        assert_eq!(singularize("customer"), "customer");
    }

    #[test]
    fn it_handles_irregular_and_uncountable_words() {
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("children"), "child");
        assert_eq!(singularize("salesmen"), "salesman");
        assert_eq!(singularize("news"), "news");
        assert_eq!(policy_name("people", "Policy"), "PersonPolicy");
    }

    #[test]
    fn it_derives_one_name_for_each_singular_and_plural_pair() {
        let pairs = [
            ("hero", "heroes", "HeroPolicy"),
            ("potato", "potatoes", "PotatoPolicy"),
            ("shoe", "shoes", "ShoePolicy"),
            ("virus", "viruses", "VirusPolicy"),
            ("octopus", "octopi", "OctopusPolicy"),
            ("crisis", "crises", "CrisisPolicy"),
            ("axis", "axes", "AxisPolicy"),
            ("tax", "taxes", "TaxPolicy"),
            ("archive", "archives", "ArchivePolicy"),
            ("hive", "hives", "HivePolicy"),
            ("native", "natives", "NativePolicy"),
            ("menu", "menus", "MenuPolicy"),
            ("bus", "buses", "BusPolicy"),
            ("alias", "aliases", "AliasPolicy"),
            ("movie", "movies", "MoviePolicy"),
            ("campus", "campuses", "CampusPolicy"),
            ("company", "companies", "CompanyPolicy"),
            ("sample", "samples", "SamplePolicy"),
        ];
        for (singular, plural, expected) in pairs {
            assert_eq!(policy_name(singular, "Policy"), expected, "{singular}");
            assert_eq!(policy_name(plural, "Policy"), expected, "{plural}");
        }
    }

    #[test]
    fn it_honours_a_custom_suffix() {
        assert_eq!(policy_name("customers", "Perm"), "CustomerPerm");
    }

    #[test]
    fn it_humanizes_for_display() {
        assert_eq!(humanize("sample"), "Sample");
        assert_eq!(humanize("line_item"), "Line Item");
    }

    proptest! {
        #[test]
        fn it_resolves_plural_and_singular_spellings_alike(stem in "[b-df-hj-np-tv-z]{2,8}[bdgkmprt]") {
            let plural = format!("{stem}s");
            prop_assert_eq!(policy_name(&stem, "Policy"), policy_name(&plural, "Policy"));
        }
    }
}
