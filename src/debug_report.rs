use spindrift::{SpinReport, TemplateMask, ValidationResult};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(template: &str, report: &SpinReport, seed: Option<&str>, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Spinning: \"{}\"", template), ansi::CYAN)));

    // Template summary
    println!("\n{}", palette.paint("━━━ Template ━━━", ansi::GRAY));
    println!(
        "  {} {}  {} {}",
        palette.dim("mask:"),
        palette.paint(fmt_mask(report.details.mask), ansi::BLUE),
        palette.dim("│ variations:"),
        palette.paint(report.details.variations.to_string(), ansi::YELLOW),
    );
    match seed {
        Some(seed) => println!("  {} {}", palette.dim("seed:"), palette.paint(seed, ansi::CYAN)),
        None => println!("  {} {}", palette.dim("seed:"), palette.dim("(entropy)")),
    }

    // Pass summary
    println!("\n{}", palette.paint("━━━ Passes ━━━", ansi::GRAY));
    if report.details.passes.is_empty() {
        println!("{}", palette.dim("  No spintax blocks found"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • The template has no {{...}} group with an unescaped |");
        println!("  • Braces are escaped (\\{{ and \\}} stay literal)");
        println!("  • Only personalization placeholders like {{first_name}} are present");
        println!("\n{}", palette.dim("  Tip: Set SPINDRIFT_DEBUG_PASSES=1 to see per-block choices"));
    } else {
        for pass in &report.details.passes {
            println!(
                "  {} {}",
                palette.paint(format!("Pass {}:", pass.pass), ansi::BLUE),
                palette.paint(format!("✓ {} block(s) in {:?}", pass.resolved, pass.duration), ansi::GREEN),
            );
            for choice in pass.choices.iter().take(5) {
                println!("    {}", palette.dim(format!("picked {:?}", choice)));
            }
            if pass.choices.len() > 5 {
                println!("    {}", palette.dim(format!("... +{} more", pass.choices.len() - 5)));
            }
        }
        if report.details.exhausted {
            println!(
                "  {}",
                palette.paint("⚠ pass bound hit; output may contain unresolved blocks", ansi::YELLOW)
            );
        }
    }

    // Result
    println!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    println!("  {}", palette.bold(palette.paint(&report.result.output, ansi::GREEN)));
    if !report.result.options_selected.is_empty() {
        println!(
            "  {} {}",
            palette.dim("selected:"),
            palette.paint(report.result.options_selected.join(" › "), ansi::CYAN)
        );
    }

    // Timing
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Expansion: {}  │  Finalize: {}",
        palette.paint(format!("{:?}", report.details.total), ansi::GREEN),
        palette.paint(format!("{:?}", report.details.expansion_total), ansi::CYAN),
        palette.dim(format!("{:?}", report.details.finalize)),
    );
    println!();
}

pub fn print_previews(template: &str, previews: &[String], color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Previewing: \"{}\"", template), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Previews ━━━", ansi::GRAY));
    if previews.is_empty() {
        println!("{}", palette.dim("  No previews produced"));
    } else {
        for (idx, preview) in previews.iter().enumerate() {
            println!(
                "  {} {}",
                palette.paint(format!("[{}]", idx + 1), ansi::GRAY),
                palette.paint(preview, ansi::GREEN)
            );
        }
    }
    println!(
        "\n  {} {}",
        palette.dim("distinct variations available:"),
        palette.paint(spindrift::count_variations(template).to_string(), ansi::YELLOW)
    );
    println!();
}

pub fn print_validation(template: &str, result: &ValidationResult, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Validating: \"{}\"", template), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Validation ━━━", ansi::GRAY));
    if result.valid {
        println!("  {}", palette.paint("✓ template is well-formed", ansi::GREEN));
    } else {
        for message in result.messages() {
            println!("  {} {}", palette.paint("✗", ansi::RED), palette.paint(message, ansi::YELLOW));
        }
        println!("\n{}", palette.dim("  Expansion stays best-effort; fix these before launching a campaign."));
    }
    println!();
}

fn fmt_mask(mask: TemplateMask) -> String {
    if mask.is_empty() {
        return "plain".to_string();
    }
    let mut parts = Vec::new();
    if mask.contains(TemplateMask::HAS_BRACES) {
        parts.push("braces");
    }
    if mask.contains(TemplateMask::HAS_PIPES) {
        parts.push("pipes");
    }
    if mask.contains(TemplateMask::HAS_ESCAPES) {
        parts.push("escapes");
    }
    if mask.contains(TemplateMask::UNBALANCED) {
        parts.push("unbalanced");
    }
    parts.join("+")
}
