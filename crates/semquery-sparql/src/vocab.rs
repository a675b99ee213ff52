//! Vocabulary used in emitted graph patterns.

use semquery_description::FixedPredicate;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const SWIVT_NS: &str = "http://semantic-mediawiki.org/swivt/1.0#";
pub const DEFAULT_PROPERTY_NS: &str = "http://example.org/id/Property-3A";

// Predicates
pub const RDF_TYPE: &str = "rdf:type";
pub const RDFS_SUBCLASS_OF: &str = "rdfs:subClassOf";
pub const RDFS_SUBPROPERTY_OF: &str = "rdfs:subPropertyOf";
pub const SWIVT_PAGE: &str = "swivt:page";
pub const SWIVT_WIKI_NAMESPACE: &str = "swivt:wikiNamespace";
pub const SWIVT_SORT_KEY: &str = "swivt:wikiPageSortKey";
pub const SWIVT_REDIRECTS_TO: &str = "swivt:redirectsTo";

pub const PROPERTY_PREFIX: &str = "property:";

/// Suffix of the auxiliary predicate (`#aux`, escaped).
pub const AUX_SUFFIX: &str = "-23aux";

/// The one pattern every unsatisfiable condition renders to.
pub const FALSE_PATTERN: &str = "<http://www.example.org> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#nothing> .\n";

// Datatypes
pub const XSD_STRING: &str = "xsd:string";
pub const XSD_DOUBLE: &str = "xsd:double";
pub const XSD_INTEGER: &str = "xsd:integer";
pub const XSD_BOOLEAN: &str = "xsd:boolean";
pub const XSD_DATE: &str = "xsd:date";

/// Prefixes a rendered condition may refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prefix {
    Rdf,
    Rdfs,
    Owl,
    Xsd,
    Swivt,
    Property,
}

pub const ALL_PREFIXES: [Prefix; 6] = [
    Prefix::Rdf,
    Prefix::Rdfs,
    Prefix::Owl,
    Prefix::Xsd,
    Prefix::Swivt,
    Prefix::Property,
];

impl Prefix {
    pub fn label(self) -> &'static str {
        match self {
            Prefix::Rdf => "rdf",
            Prefix::Rdfs => "rdfs",
            Prefix::Owl => "owl",
            Prefix::Xsd => "xsd",
            Prefix::Swivt => "swivt",
            Prefix::Property => "property",
        }
    }

    /// Namespace IRI; the property namespace is deployment-specific.
    pub fn iri(self, property_namespace: &str) -> String {
        match self {
            Prefix::Rdf => RDF_NS.to_string(),
            Prefix::Rdfs => RDFS_NS.to_string(),
            Prefix::Owl => OWL_NS.to_string(),
            Prefix::Xsd => XSD_NS.to_string(),
            Prefix::Swivt => SWIVT_NS.to_string(),
            Prefix::Property => property_namespace.to_string(),
        }
    }
}

pub fn fixed_predicate_qname(predicate: FixedPredicate) -> &'static str {
    match predicate {
        FixedPredicate::RdfType => RDF_TYPE,
        FixedPredicate::SubClassOf => RDFS_SUBCLASS_OF,
        FixedPredicate::SubPropertyOf => RDFS_SUBPROPERTY_OF,
        FixedPredicate::WikiPageSortKey => SWIVT_SORT_KEY,
        FixedPredicate::RedirectsTo => SWIVT_REDIRECTS_TO,
    }
}
