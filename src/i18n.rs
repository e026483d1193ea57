// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）、英文与巴西葡萄牙语
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// 支持的语言列表
pub const SUPPORTED_LOCALES: &[&str] = &["zh-CN", "en", "pt-BR"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN"、"en" 或 "pt-BR"）
///
/// # 返回
/// - true: 已切换
/// - false: 不支持的语言，回落到默认语言
pub fn set_locale(locale: &str) -> bool {
    let locale = locale.trim();
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
        true
    } else {
        tracing::warn!(locale, "不支持的语言,回落到 {}", DEFAULT_LOCALE);
        rust_i18n::set_locale(DEFAULT_LOCALE);
        false
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use smartpick::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use smartpick::i18n::t_with_args;
/// let msg = t_with_args("picking.load_failed", &[("message", "timeout")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行;
    // 凡依赖当前语言的测试都需持有此锁。
    pub(crate) static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale(DEFAULT_LOCALE);
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        assert!(set_locale("pt-BR"));
        assert_eq!(current_locale(), "pt-BR");

        assert!(set_locale("en"));
        assert_eq!(current_locale(), "en");

        // 不支持的语言回落到默认
        assert!(!set_locale("fr"));
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("common.success"), "操作成功");

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale("pt-BR");
        assert_eq!(
            t("picking.finalize_confirm"),
            "Deseja realmente finalizar esta sessão e salvar o histórico?"
        );

        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("picking.load_failed", &[("message", "timeout")]);
        assert_eq!(msg, "Failed to load the picking list: timeout");

        set_locale("zh-CN");
        let msg = t_with_args("picking.not_found", &[("entity", "套件"), ("id", "K1")]);
        assert!(msg.contains("K1"));
        assert!(msg.contains("未找到"));
    }
}
