//! 設定ファイルの読み書き

use std::io::ErrorKind;
use std::path::Path;

use serde_json::{
    Map,
    Value,
};

use super::{
    ConfigError,
    EditorSettings,
};

/// ワークスペースルートに置く設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".xcstrings-editor.json";

/// ワークスペースから設定を読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<EditorSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = ?config_path, "No configuration file");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(path = ?config_path, "Loading configuration");
    Ok(Some(serde_json::from_str(&content)?))
}

/// 既存の設定ファイルへ `settings` を書き戻す
///
/// ファイルにあるキーはその位置で更新し、ないキーはデフォルトと異なる
/// ときだけ末尾に追加する。未知のキーはそのまま残る。
/// 設定ファイルがなければ作成せず `Ok(false)` を返す。
///
/// # Errors
/// - ファイル読み書きエラー
/// - 既存ファイルが JSON オブジェクトでない
pub(super) fn save_to_workspace(
    workspace_root: &Path,
    settings: &EditorSettings,
) -> Result<bool, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = ?config_path, "No configuration file to update");
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    let mut document: Map<String, Value> = serde_json::from_str(&content)?;
    let defaults = to_object(&EditorSettings::default())?;
    for (key, value) in to_object(settings)? {
        if document.contains_key(&key) || defaults.get(&key) != Some(&value) {
            document.insert(key, value);
        }
    }

    let mut bytes = serde_json::to_vec_pretty(&document)?;
    bytes.push(b'\n');
    std::fs::write(&config_path, bytes)?;
    tracing::debug!(path = ?config_path, "Saved configuration");

    Ok(true)
}

/// Settings as a JSON object in field order
fn to_object(settings: &EditorSettings) -> Result<Map<String, Value>, ConfigError> {
    match serde_json::to_value(settings)? {
        Value::Object(object) => Ok(object),
        _ => Ok(Map::new()),
    }
}
