use bigdecimal::BigDecimal;

/// 输入值允许的最大小数位数 (正负指数同样限制)
pub const MAX_INPUT_SCALE: i64 = 18;

/// 输入值有效数字上限, 以二进制位计 (约 38 位十进制)
pub const MAX_INPUT_MANTISSA_BITS: u64 = 128;

/// 外部输入的十进制是否在可计算范围内
///
/// 指数过大的值 (例如 `1e-200000`) 在与其他值对齐小数位后会变成
/// 数十万位的整数, 后续每次运算都随位数平方增长。
pub fn within_input_bounds(value: &BigDecimal) -> bool {
    let (mantissa, scale) = value.as_bigint_and_exponent();
    scale.abs() <= MAX_INPUT_SCALE && mantissa.bits() <= MAX_INPUT_MANTISSA_BITS
}
