use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub online: fn(&str) -> String,
    pub offline: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub value: fn(&str) -> String,
    pub age: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "temp" | "" => Self::temp(),
            "canvas" => Self::canvas(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::temp()
            }
        }
    }

    fn temp() -> Self {
        Self {
            title: |s| s.bright_magenta().bold().underline().to_string(),
            online: |s| s.green().bold().to_string(),
            offline: |s| s.black().on_yellow().bold().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            label: |s| s.cyan().to_string(),
            value: |s| s.white().to_string(),
            age: |s| s.bright_white().dimmed().italic().to_string(),
        }
    }

    fn canvas() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            online: |s| s.green().to_string(),
            offline: |s| s.red().bold().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            label: |s| s.bright_cyan().bold().to_string(),
            value: |s| s.black().to_string(),
            age: |s| s.bright_black().italic().to_string(),
        }
    }
}
