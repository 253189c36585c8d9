use clap::{command, Arg, ArgAction, Command, ValueHint};

pub fn build_command() -> Command {
    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args([
            Arg::new("config")
                .short('c')
                .long("config-file")
                .alias("config")
                .global(true)
                .required(false)
                .value_hint(ValueHint::FilePath)
                .value_name("PATH")
                .help("Path to the YAML config file."),
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log more detail (repeat for debug and trace output)."),
        ])
        .subcommand(
            Command::new("html")
                .about("Export the games of a saved library page to CSV.")
                .args([
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .required(false)
                        .value_hint(ValueHint::FilePath)
                        .value_name("PATH")
                        .help("Saved library page to read."),
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .alias("out")
                        .required(false)
                        .value_hint(ValueHint::FilePath)
                        .value_name("PATH")
                        .help("CSV file to write."),
                    Arg::new("localized")
                        .long("localized")
                        .action(ArgAction::SetTrue)
                        .help("Use localized column headers."),
                ]),
        )
        .subcommand(
            Command::new("profile")
                .about("List the games of a public Steam profile.")
                .arg(
                    Arg::new("profile_url")
                        .required(true)
                        .value_hint(ValueHint::Url)
                        .value_name("PROFILE_URL")
                        .help("Full profile URL, e.g. https://steamcommunity.com/id/your_id/"),
                ),
        )
}
