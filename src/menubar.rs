use std::io;

use crossterm::{queue, style};

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim, unless `active` is set, in which case
/// it is printed reversed to mark a toggle that is currently on.
pub fn print_menu_item(stdout: &mut io::Stdout, item: &str, active: bool) -> anyhow::Result<()> {
    let label_attr = if active {
        style::Attribute::Reverse
    } else {
        style::Attribute::Dim
    };

    let mut rest = item;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            print_with(stdout, label_attr, rest)?;
            break;
        };
        if open > 0 {
            print_with(stdout, label_attr, &rest[..open])?;
        }
        rest = &rest[open..];
        match rest.find(']') {
            Some(close) => {
                print_with(stdout, style::Attribute::Bold, &rest[..=close])?;
                rest = &rest[close + 1..];
            }
            None => {
                queue!(stdout, style::Print(rest))?;
                break;
            }
        }
    }
    Ok(())
}

fn print_with(stdout: &mut io::Stdout, attr: style::Attribute, text: &str) -> anyhow::Result<()> {
    queue!(
        stdout,
        style::SetAttribute(attr),
        style::Print(text),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}

/// Display width of a menu item.
pub fn item_width(item: &str) -> u16 {
    item.chars().count() as u16
}
