//! KiCad footprint `(model ...)` reference block.

use crate::transform::Transform;

/// Format a coordinate the way KiCad writes them: at most three decimals,
/// no trailing zeros, no negative zero.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 || !rounded.is_finite() {
        return "0".to_string();
    }
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn xyz(values: &[f64; 3]) -> String {
    format!(
        "(xyz {} {} {})",
        format_number(values[0]),
        format_number(values[1]),
        format_number(values[2])
    )
}

fn quote(path: &str) -> String {
    let escaped = path.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Render the model reference for a footprint.
///
/// `indent` is one nesting step; the block itself starts `level` steps in.
pub fn render_model_block(
    path: &str,
    transform: &Transform,
    indent: &str,
    level: usize,
) -> String {
    let i0 = indent.repeat(level);
    let i1 = indent.repeat(level + 1);
    let i2 = indent.repeat(level + 2);
    let path = quote(path);
    let offset = xyz(&transform.offset);
    let scale = xyz(&[1.0, 1.0, 1.0]);
    let rotate = xyz(&transform.rotation);

    format!(
        "{i0}(model {path}\n\
         {i1}(offset\n\
         {i2}{offset}\n\
         {i1})\n\
         {i1}(scale\n\
         {i2}{scale}\n\
         {i1})\n\
         {i1}(rotate\n\
         {i2}{rotate}\n\
         {i1})\n\
         {i0})\n"
    )
}
