//! ActionArgs trait - capability 名と引数の型を対応付ける
//!
//! # 学習ポイント
//! - Associated Constants (`const ACTION_NAME`, `const PARAM_NAMES`)
//! - 名前による late binding を残しつつ、引数の型はコンパイル時に決める

use serde::de::DeserializeOwned;

/// ActionArgs は action_name と引数の型を対応付ける
///
/// # 使用例
/// ```ignore
/// #[derive(Deserialize)]
/// struct Echo {
///     text: String,
/// }
///
/// impl ActionArgs for Echo {
///     const ACTION_NAME: &'static str = "echo";
///     const PARAM_NAMES: &'static [&'static str] = &["text"];
/// }
/// ```
///
/// 引数なしの capability はフィールドなしの struct（`struct Ping {}`）と
/// 空の `PARAM_NAMES` で表します。
pub trait ActionArgs: DeserializeOwned + Send + 'static {
    /// The capability name matched against `Action::action_name`.
    const ACTION_NAME: &'static str;

    /// Declared parameter names. Arguments outside this set fail binding.
    const PARAM_NAMES: &'static [&'static str];
}
