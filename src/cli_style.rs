use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Magenta))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Magenta))),
        )
        .literal(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const SAKURA: Color = Color::Rgb {
        r: 255,
        g: 150,
        b: 200,
    };
    pub const INDIGO: Color = Color::Rgb {
        r: 120,
        g: 110,
        b: 255,
    };
    pub const GOLD: Color = Color::Rgb {
        r: 255,
        g: 200,
        b: 60,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 220,
        b: 130,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

pub mod box_chars {
    pub const SINGLE_HORIZONTAL: &str = "─";
    pub const SINGLE_VERTICAL: &str = "│";

    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";

    pub const T_LEFT: &str = "├";
    pub const T_RIGHT: &str = "┤";
    pub const T_TOP: &str = "┬";
    pub const T_BOTTOM: &str = "┴";
    pub const CROSS: &str = "┼";

    pub const ARROW_RIGHT: &str = "▶";
    pub const BULLET: &str = "●";
    pub const BULLET_EMPTY: &str = "○";
    pub const DIAMOND: &str = "◆";
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
    pub const BAR_FULL: &str = "█";
}

// ═══════════════════════════════════════════════════════════════════════════════
// Banner
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_banner(dataset_path: &str, titles: usize) {
    let banner = r#"
     ▄▀█ █▄ █ █ █▀▄▀█ █▀▀   ▄▀█ █▄ █ ▄▀█ █   █▄█ ▀█▀ █ █▀▀ █▀
     █▀█ █ ▀█ █ █ ▀ █ ██▄   █▀█ █ ▀█ █▀█ █▄▄  █   █  █ █▄▄ ▄█
"#;
    let gradient_colors = [colors::SAKURA, colors::SAKURA, colors::INDIGO];
    for (i, line) in banner.lines().enumerate() {
        let color = gradient_colors.get(i).unwrap_or(&colors::INDIGO);
        println!("{}", line.with(*color).bold());
    }
    println!();
    print_key_value("Dataset", dataset_path);
    print_key_value("Titles", &titles.to_string());
    print_key_value("Build", env!("GIT_HASH"));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        box_chars::CHECK.to_string().with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        box_chars::CROSS_MARK.to_string().with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════════

const SECTION_WIDTH: usize = 60;

pub fn print_section_header(title: &str) {
    let title_len = title.width();
    let padding = SECTION_WIDTH.saturating_sub(title_len + 4) / 2;

    println!();
    print!("{}", box_chars::ROUND_TOP_LEFT.with(colors::SAKURA));
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(padding)
            .with(colors::SAKURA)
    );
    print!(
        " {} ",
        title
            .with(colors::SAKURA)
            .bold()
            .attribute(Attribute::Italic)
    );
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(SECTION_WIDTH.saturating_sub(title_len + 4 + padding))
            .with(colors::SAKURA)
    );
    println!("{}", box_chars::ROUND_TOP_RIGHT.with(colors::SAKURA));
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::BULLET.with(colors::INDIGO),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_key_value_highlight(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::DIAMOND.with(colors::SAKURA),
        format!("{}:", key).with(colors::GOLD).bold(),
        value.with(colors::GREEN).bold()
    );
}

pub fn print_list_item(item: &str, color: CtColor) {
    println!(
        "  {}  {}",
        box_chars::ARROW_RIGHT.with(color),
        item.with(colors::WHITE)
    );
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        box_chars::BULLET_EMPTY.with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Charts
// ═══════════════════════════════════════════════════════════════════════════════

/// Horizontal bar scaled so that `max` fills `width` cells. Non-zero counts
/// always get at least one cell.
pub fn bar(count: usize, max: usize, width: usize) -> String {
    if count == 0 || max == 0 || width == 0 {
        return String::new();
    }
    let cells = (count * width).div_ceil(max).clamp(1, width);
    box_chars::BAR_FULL.repeat(cells)
}

pub fn print_bar_chart(rows: &[(String, usize)], width: usize) {
    let label_width = rows.iter().map(|(l, _)| l.width()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, c)| *c).max().unwrap_or(0);
    for (label, count) in rows {
        println!(
            "  {}{} {} {}",
            label.clone().with(colors::DIM),
            " ".repeat(label_width - label.width()),
            bar(*count, max, width).with(colors::INDIGO),
            count.to_string().with(colors::WHITE)
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tables
// ═══════════════════════════════════════════════════════════════════════════════

pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: &[&str]) -> Self {
        TableBuilder {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths: headers.iter().map(|h| h.width()).collect(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        for (width, cell) in self.col_widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
        self.rows.push(row);
    }

    fn print_border(&self, left: &str, junction: &str, right: &str) {
        let segments: Vec<String> = self
            .col_widths
            .iter()
            .map(|w| box_chars::SINGLE_HORIZONTAL.repeat(w + 2))
            .collect();
        println!(
            "{}",
            format!("{}{}{}", left, segments.join(junction), right).with(colors::INDIGO)
        );
    }

    fn print_cells(&self, cells: &[String], color: CtColor, bold: bool) {
        print!("{}", box_chars::SINGLE_VERTICAL.with(colors::INDIGO));
        for (i, width) in self.col_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let padding = " ".repeat(width.saturating_sub(cell.width()));
            let styled = cell.to_string().with(color);
            if bold {
                print!(" {}{} ", styled.bold(), padding);
            } else {
                print!(" {}{} ", styled, padding);
            }
            print!("{}", box_chars::SINGLE_VERTICAL.with(colors::INDIGO));
        }
        println!();
    }

    pub fn print(&self) {
        self.print_border(
            box_chars::ROUND_TOP_LEFT,
            box_chars::T_TOP,
            box_chars::ROUND_TOP_RIGHT,
        );
        self.print_cells(&self.headers, colors::GOLD, true);
        self.print_border(box_chars::T_LEFT, box_chars::CROSS, box_chars::T_RIGHT);
        for row in &self.rows {
            self.print_cells(row, colors::WHITE, false);
        }
        self.print_border(
            box_chars::ROUND_BOTTOM_LEFT,
            box_chars::T_BOTTOM,
            box_chars::ROUND_BOTTOM_RIGHT,
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prompt
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_prompt() -> String {
    format!(
        "{}{} ",
        "❯".with(colors::SAKURA).bold(),
        "❯".with(colors::INDIGO).bold(),
    )
}

pub fn print_command_echo(command: &str) {
    println!(
        "{}{}  {}",
        "❯".with(colors::SAKURA).bold(),
        "❯".with(colors::INDIGO).bold(),
        command.with(colors::GREEN).bold()
    );
}

pub fn print_goodbye() {
    println!();
    println!("  {}", "さようなら!".with(colors::SAKURA).bold());
    println!();
}
