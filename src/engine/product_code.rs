// ==========================================
// 仓库拣料核对系统 - 物料编码展示格式
// ==========================================
// ERP 物料编码为 13 位数字，展示为 DD.DDD.DDD.DDDDD
// ==========================================

/// 标准编码长度
pub const PRODUCT_CODE_LEN: usize = 13;

/// 格式化物料编码用于展示
///
/// - 去除首尾空白
/// - 不足 13 位时左侧补 0
/// - 恰为 13 位数字时按 2.3.3.5 分段
/// - 其他情况原样返回（已补零）
pub fn format_product_code(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let padded = format!("{:0>width$}", trimmed, width = PRODUCT_CODE_LEN);
    let all_digits = padded.len() == PRODUCT_CODE_LEN && padded.bytes().all(|b| b.is_ascii_digit());
    if !all_digits {
        return padded;
    }

    format!(
        "{}.{}.{}.{}",
        &padded[0..2],
        &padded[2..5],
        &padded[5..8],
        &padded[8..13]
    )
}
