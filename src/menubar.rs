use std::io::Write;

use crossterm::{queue, style};

/// Print a menu item string, bolding the key names inside `[...]` brackets
/// and dimming the description around them.
pub fn print_menu_item(out: &mut impl Write, item: &str) -> anyhow::Result<()> {
    let mut rest = item;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            queue!(
                out,
                style::SetAttribute(style::Attribute::Dim),
                style::Print(rest),
                style::SetAttribute(style::Attribute::Reset),
            )?;
            break;
        };
        if open > 0 {
            queue!(
                out,
                style::SetAttribute(style::Attribute::Dim),
                style::Print(&rest[..open]),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
        rest = &rest[open..];
        let Some(close) = rest.find(']') else {
            queue!(out, style::Print(rest))?;
            break;
        };
        queue!(
            out,
            style::SetAttribute(style::Attribute::Bold),
            style::Print(&rest[..=close]),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        rest = &rest[close + 1..];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(item: &str) -> String {
        let mut out = Vec::new();
        print_menu_item(&mut out, item).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn keys_are_bold() {
        let text = printed("[q] quit");
        assert!(text.contains("\x1b[1m[q]"));
        assert!(text.contains(" quit"));
    }

    #[test]
    fn unclosed_bracket_is_printed_verbatim() {
        assert!(printed("[oops").ends_with("[oops"));
    }
}
