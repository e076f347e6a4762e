//! String catalog data model
/// Key order kept per object
mod layout;
/// Catalog, entry and localization types
mod model;
/// Variation path addressing
mod path;
/// Terminal values and translation states
mod unit;
/// Variation tree
mod variation;

pub use model::{
    Catalog,
    Entry,
    Localization,
};
pub use path::{
    PathError,
    PathSegment,
    VariationPath,
};
pub use unit::{
    StringUnit,
    TranslationState,
};
pub use variation::{
    VariationKeys,
    VariationNode,
    VariationsMap,
};
