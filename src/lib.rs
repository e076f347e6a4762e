//! xcstrings-editor
//!
//! Xcode String Catalog (`.xcstrings`) ファイルの編集コア。
//! 読み込み・書き出し、バリエーションツリーの平坦化とパッチ、未翻訳判定を提供する。

pub mod catalog;
pub mod codec;
pub mod completeness;
pub mod config;
pub mod flatten;
pub mod patch;
pub mod store;
pub mod translation;
pub mod view;
pub mod workspace;

#[cfg(test)]
mod test_utils;

pub use catalog::{
    Catalog,
    Entry,
    Localization,
    StringUnit,
    TranslationState,
    VariationPath,
};
pub use store::{
    DocumentStore,
    StoreError,
};
