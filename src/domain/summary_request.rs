// プロジェクトサマリー作成リクエスト
//
// HTTPリクエストボディから6つのフィールドを抽出し、
// 必須フィールドの存在を検証する。

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// 必須フィールド
///
/// 宣言順はエラーメッセージでの列挙順と一致する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    ApplicationId,
    LandlortCertId,
    LandlortCertRef,
    TenantGrantAgreementRef,
    TenantGrantAgreementId,
}

impl RequiredField {
    /// 全必須フィールド（宣言順）
    pub const ALL: [RequiredField; 5] = [
        RequiredField::ApplicationId,
        RequiredField::LandlortCertId,
        RequiredField::LandlortCertRef,
        RequiredField::TenantGrantAgreementRef,
        RequiredField::TenantGrantAgreementId,
    ];

    /// リクエストボディ上のフィールド名
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::ApplicationId => "applicationId",
            RequiredField::LandlortCertId => "landlortCertId",
            RequiredField::LandlortCertRef => "landlortCertRef",
            RequiredField::TenantGrantAgreementRef => "tenantGrantAgreementRef",
            RequiredField::TenantGrantAgreementId => "tenantGrantAgreementId",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// refsOnlyフィールド名
pub const REFS_ONLY_FIELD: &str = "refsOnly";

/// 必須フィールド欠落エラー
///
/// 表示形式は `Missing required properties: a,b,c`（カンマ区切り、空白なし）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required properties: {}", join_field_names(.missing))]
pub struct MissingFieldsError {
    missing: Vec<RequiredField>,
}

impl MissingFieldsError {
    pub fn new(missing: Vec<RequiredField>) -> Self {
        Self { missing }
    }

    /// 欠落しているフィールド（宣言順）
    pub fn missing(&self) -> &[RequiredField] {
        &self.missing
    }

    /// 400レスポンスのボディ
    ///
    /// エラーメッセージを1件だけ含む配列を返す。
    pub fn to_response_body(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

fn join_field_names(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(RequiredField::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// 不透明な識別子・参照値
///
/// 中身は解釈せず、受け取ったJSON値を型変換なしで外部APIへ転送する。
/// nullも「存在する値」として扱う（欠落はキーが無い場合のみ）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Identifier(Value);

impl Identifier {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// 受け取ったままのJSON値
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// リクエストボディから抽出した未検証のパラメータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedParams {
    pub application_id: Option<Identifier>,
    pub landlort_cert_id: Option<Identifier>,
    pub landlort_cert_ref: Option<Identifier>,
    pub tenant_grant_agreement_ref: Option<Identifier>,
    pub tenant_grant_agreement_id: Option<Identifier>,
    /// 未指定・偽値の場合はfalse、それ以外は受け取った値のまま
    pub refs_only: Value,
}

impl Default for ExtractedParams {
    fn default() -> Self {
        Self {
            application_id: None,
            landlort_cert_id: None,
            landlort_cert_ref: None,
            tenant_grant_agreement_ref: None,
            tenant_grant_agreement_id: None,
            refs_only: Value::Bool(false),
        }
    }
}

impl ExtractedParams {
    /// 生のリクエストボディからパラメータを抽出
    ///
    /// ボディが空・JSONでない・オブジェクトでない場合は、
    /// 全フィールドが欠落しているものとして扱う。
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Self::from_map(&map),
            _ => Self::default(),
        }
    }

    /// JSONオブジェクトからパラメータを抽出
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let field = |name: RequiredField| map.get(name.as_str()).cloned().map(Identifier);

        Self {
            application_id: field(RequiredField::ApplicationId),
            landlort_cert_id: field(RequiredField::LandlortCertId),
            landlort_cert_ref: field(RequiredField::LandlortCertRef),
            tenant_grant_agreement_ref: field(RequiredField::TenantGrantAgreementRef),
            tenant_grant_agreement_id: field(RequiredField::TenantGrantAgreementId),
            refs_only: map
                .get(REFS_ONLY_FIELD)
                .filter(|value| is_truthy(value))
                .cloned()
                .unwrap_or(Value::Bool(false)),
        }
    }

    /// 必須フィールドの存在を検証
    ///
    /// # 戻り値
    /// * `Ok(RequestParams)` - 全必須フィールドが存在する
    /// * `Err(MissingFieldsError)` - 欠落フィールドを宣言順に列挙したエラー
    pub fn validate(self) -> Result<RequestParams, MissingFieldsError> {
        match (
            self.application_id,
            self.landlort_cert_id,
            self.landlort_cert_ref,
            self.tenant_grant_agreement_ref,
            self.tenant_grant_agreement_id,
        ) {
            (
                Some(application_id),
                Some(landlort_cert_id),
                Some(landlort_cert_ref),
                Some(tenant_grant_agreement_ref),
                Some(tenant_grant_agreement_id),
            ) => Ok(RequestParams {
                application_id,
                landlort_cert_id,
                landlort_cert_ref,
                tenant_grant_agreement_ref,
                tenant_grant_agreement_id,
                refs_only: self.refs_only,
            }),
            (a, b, c, d, e) => {
                let present = [a.is_some(), b.is_some(), c.is_some(), d.is_some(), e.is_some()];
                let missing = RequiredField::ALL
                    .into_iter()
                    .zip(present)
                    .filter(|(_, present)| !present)
                    .map(|(field, _)| field)
                    .collect();
                Err(MissingFieldsError::new(missing))
            }
        }
    }
}

/// JavaScript互換の真偽値判定
///
/// null, false, 0, 空文字列は偽、それ以外は真。
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 検証済みのプロジェクトサマリー作成パラメータ
///
/// 外部APIへはcamelCaseのフィールド名でシリアライズされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParams {
    pub application_id: Identifier,
    pub landlort_cert_id: Identifier,
    pub landlort_cert_ref: Identifier,
    pub tenant_grant_agreement_ref: Identifier,
    pub tenant_grant_agreement_id: Identifier,
    pub refs_only: Value,
}
