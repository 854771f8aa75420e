use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "dynread")]
#[command(version)]
#[command(about = "Read generated stories and text files one word at a time")]
pub struct Cli {
    /// Words per minute for this run (not saved)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub wpm: Option<u32>,

    /// Story length in words for this run (not saved)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub words: Option<u32>,

    /// Start reading a text file right away
    #[arg(long, value_name = "PATH", conflicts_with = "synopsis")]
    pub file: Option<String>,

    /// Generate a story from this synopsis right away
    #[arg(value_name = "SYNOPSIS", num_args = 0.., trailing_var_arg = true)]
    pub synopsis: Vec<String>,
}

impl Cli {
    /// Positional words joined back into one synopsis.
    pub fn synopsis(&self) -> Option<String> {
        let synopsis = self.synopsis.join(" ");
        (!synopsis.trim().is_empty()).then_some(synopsis)
    }
}
