//! ドキュメントストア
//!
//! 現在のカタログを 1 つだけ保持し、編集はすべて [`patch`] に委譲する。
//! 編集は直前の結果に対して順番に適用される。

use thiserror::Error;

use crate::catalog::{
    Catalog,
    PathError,
    VariationPath,
};
use crate::codec::{
    self,
    ExportOptions,
    ParseError,
};
use crate::completeness::has_variations;
use crate::patch::{
    PatchError,
    patch,
};
use crate::translation::extract_translation;

/// ストア操作のエラー
#[derive(Error, Debug)]
pub enum StoreError {
    /// カタログが読み込まれていない
    #[error("No catalog is loaded")]
    NoDocument,
    /// 読み込みに失敗した
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// パッチの適用に失敗した
    #[error(transparent)]
    Patch(#[from] PatchError),
    /// バリエーションパスの書式が不正
    #[error("Invalid variation path: {0}")]
    Path(#[from] PathError),
    /// 書き出しに失敗した
    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
    /// ソースか対象がバリエーションを持つため、フラットな値をコピーできない
    #[error("Cannot copy the source value of '{0}': the entry has variations")]
    HasVariations(String),
    /// 応答に `<translation>` の中身がない
    #[error("The response has no translation for '{0}'")]
    EmptyTranslation(String),
}

/// 編集中のカタログを保持する
#[derive(Debug, Default, Clone)]
pub struct DocumentStore {
    /// 現在のカタログ
    catalog: Option<Catalog>,
    /// 書き出し設定
    export_options: ExportOptions,
}

impl DocumentStore {
    /// 空のストアを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 書き出し設定を指定してストアを作成
    #[must_use]
    pub const fn with_export_options(export_options: ExportOptions) -> Self {
        Self { catalog: None, export_options }
    }

    /// 現在のカタログを取得
    #[must_use]
    pub const fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// ファイル内容を読み込み、現在のカタログを置き換える
    ///
    /// 失敗した場合は現在のカタログを維持する。
    ///
    /// # Errors
    /// - JSON パースエラー
    /// - 必須フィールドの欠落
    pub fn import(&mut self, bytes: &[u8]) -> Result<&Catalog, ParseError> {
        let catalog = codec::import(bytes)?;
        Ok(self.catalog.insert(catalog))
    }

    /// 現在のカタログを書き出す
    ///
    /// # Errors
    /// - カタログ未読み込み
    /// - シリアライズエラー
    pub fn export(&self) -> Result<Vec<u8>, StoreError> {
        let catalog = self.catalog.as_ref().ok_or(StoreError::NoDocument)?;
        Ok(codec::export_with(catalog, self.export_options)?)
    }

    /// 翻訳を更新する
    ///
    /// `path` が空文字または `None` の場合はフラットな値を編集する。
    ///
    /// # Errors
    /// - カタログ未読み込み
    /// - 不正なパス
    /// - キーが存在しない
    pub fn update_translation(
        &mut self,
        key: &str,
        value: &str,
        language: &str,
        path: Option<&str>,
    ) -> Result<&Catalog, StoreError> {
        let current = self.catalog.as_ref().ok_or(StoreError::NoDocument)?;
        let path = path.filter(|text| !text.is_empty()).map(str::parse::<VariationPath>).transpose()?;

        let updated = patch(current, key, language, value, path.as_ref()).inspect_err(|e| {
            tracing::warn!(key, language, "Translation update failed: {e}");
        })?;

        Ok(self.catalog.insert(updated))
    }

    /// ソース言語の値を対象言語へそのままコピーする
    ///
    /// ソース側に値がない場合はキー自体をコピーする。
    /// バリエーションを持つエントリは対象外で、カタログは変わらない。
    ///
    /// # Errors
    /// - カタログ未読み込み
    /// - キーが存在しない
    /// - ソースか対象がバリエーションを持つ
    pub fn copy_source(&mut self, key: &str, language: &str) -> Result<&Catalog, StoreError> {
        let catalog = self.catalog.as_ref().ok_or(StoreError::NoDocument)?;
        let entry = catalog.entry(key).ok_or_else(|| PatchError::KeyNotFound(key.to_string()))?;
        if has_variations(
            entry.localization(&catalog.source_language),
            entry.localization(language),
        ) {
            return Err(StoreError::HasVariations(key.to_string()));
        }
        let source_value = entry
            .localization(&catalog.source_language)
            .and_then(|localization| localization.string_unit())
            .map_or(key, |unit| unit.value.as_str())
            .to_string();

        self.update_translation(key, &source_value, language, None)
    }

    /// 翻訳プロバイダーの応答から `<translation>` の中身を取り出して適用する
    ///
    /// 応答にタグがない、または中身が空の場合は既存の値を残してエラーにする。
    ///
    /// # Errors
    /// - 取り出した翻訳が空
    /// - [`Self::update_translation`] と同じ
    pub fn apply_translation(
        &mut self,
        key: &str,
        language: &str,
        path: Option<&str>,
        response: &str,
    ) -> Result<&Catalog, StoreError> {
        let translation = extract_translation(response);
        if translation.is_empty() {
            tracing::warn!(key, language, "Translation response has no <translation> content");
            return Err(StoreError::EmptyTranslation(key.to_string()));
        }
        self.update_translation(key, &translation, language, path)
    }
}
