//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    ConfigError,
    EditorSettings,
    loader,
};

/// コマンド実行中の設定と、その読み込み元
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: EditorSettings,

    /// 設定を読み込んだワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// デフォルト設定のマネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ワークスペースの設定ファイルを読み込む
    ///
    /// ファイルがなければデフォルト設定になる。
    /// 失敗した場合は現在の設定とワークスペースを維持する。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let settings = match &workspace_root {
            Some(root) => loader::load_from_workspace(root)?.unwrap_or_default(),
            None => EditorSettings::default(),
        };
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        tracing::debug!(
            workspace_root = ?workspace_root,
            target_language = ?settings.target_language,
            "Settings loaded"
        );
        self.current_settings = settings;
        self.workspace_root = workspace_root;
        Ok(())
    }

    /// 設定を検証して置き換える
    ///
    /// # Errors
    /// - バリデーションエラー
    pub fn update_settings(&mut self, new_settings: EditorSettings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.current_settings = new_settings;
        Ok(())
    }

    /// 編集に使った対象言語を `targetLanguage` として記録する
    ///
    /// ワークスペースに設定ファイルがあればそこへ書き戻す。
    /// ファイルがない場合はこの実行の間だけ記録し、新しくは作らない。
    ///
    /// # Errors
    /// - バリデーションエラー
    /// - ファイル読み書きエラー
    pub fn remember_target_language(&mut self, language: &str) -> Result<(), ConfigError> {
        if self.current_settings.target_language.as_deref() == Some(language) {
            return Ok(());
        }

        self.update_settings(EditorSettings {
            target_language: Some(language.to_string()),
            ..self.current_settings.clone()
        })?;

        if let Some(root) = &self.workspace_root {
            let saved = loader::save_to_workspace(root, &self.current_settings)?;
            tracing::debug!(language, saved, "Remembered target language");
        }
        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &EditorSettings {
        &self.current_settings
    }
}
