// NJRA API接続用シークレット設定
//
// フォームID、フローURL、APIキー、APIシークレットの4つを
// SecretSourceから読み込む。本番では環境変数を毎リクエスト読み直す。

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// フォームIDの環境変数名
pub const FORM_ID_VAR: &str = "NJRA_projectSummaryFormId";

/// フローURLの環境変数名
pub const FLOW_URL_VAR: &str = "NJRA_projectSummaryFlowUrl";

/// APIキーの環境変数名
pub const API_KEY_VAR: &str = "NJRA_API_KEY";

/// APIシークレットの環境変数名
pub const API_SECRET_VAR: &str = "NJRA_API_SECRET";

/// シークレット設定のエラー型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須のシークレットが未設定または空
    #[error("Missing secret: {0}")]
    MissingSecret(&'static str),
}

/// シークレットの取得元
///
/// 環境変数への直接アクセスを抽象化し、
/// テストでプロセスの環境変数を書き換えずに済むようにする。
pub trait SecretSource: Send + Sync {
    /// 名前に対応する値を取得（未設定ならNone）
    fn get(&self, name: &str) -> Option<String>;
}

/// 環境変数からシークレットを読み込む実装
///
/// キャッシュせず、呼び出しのたびに`std::env::var`を参照する。
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretSource;

impl SecretSource for EnvSecretSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl SecretSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// 外部API呼び出しに必要なシークレット
#[derive(Clone, PartialEq, Eq)]
pub struct Secrets {
    form_id: String,
    flow_url: String,
    api_key: String,
    api_secret: String,
}

impl Secrets {
    /// 取得元から4つのシークレットを読み込む
    ///
    /// フォームID、フローURL、APIキー、APIシークレットの順に確認し、
    /// 最初に見つかった未設定（または空）のものをエラーとして返す。
    ///
    /// # 戻り値
    /// - `Ok(Secrets)`: 全シークレットが設定されている
    /// - `Err(ConfigError::MissingSecret)`: 未設定のシークレット名
    pub fn load<S: SecretSource + ?Sized>(source: &S) -> Result<Self, ConfigError> {
        Ok(Self {
            form_id: require(source, FORM_ID_VAR)?,
            flow_url: require(source, FLOW_URL_VAR)?,
            api_key: require(source, API_KEY_VAR)?,
            api_secret: require(source, API_SECRET_VAR)?,
        })
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn flow_url(&self) -> &str {
        &self.flow_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

// APIキーとシークレットはログに出さない
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("form_id", &self.form_id)
            .field("flow_url", &self.flow_url)
            .finish_non_exhaustive()
    }
}

fn require<S: SecretSource + ?Sized>(source: &S, name: &'static str) -> Result<String, ConfigError> {
    match source.get(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingSecret(name)),
    }
}
