use clap::Parser;
use jqt::cli::commands;
use jqt::cli::{Cli, Commands};
use jqt::core::Config;
use miette::Result;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let mut cli = Cli::parse();
    jqt::core::logging::init(cli.global.verbose);
    cli.global
        .apply_default_format(Config::load().default_format.as_deref());
    let global = &cli.global;

    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Piece(cmd) => commands::piece::run(cmd, global),
        Commands::Hw(cmd) => commands::hw::run(cmd, global),
        Commands::Fixed(cmd) => commands::fixed::run(cmd, global),
        Commands::Catalog(cmd) => commands::catalog::run(cmd, global),
        Commands::Labor(cmd) => commands::labor::run(cmd, global),
        Commands::Cost(cmd) => commands::cost::run(cmd, global),
        Commands::Rate(cmd) => commands::rate::run(cmd, global),
        Commands::Service(cmd) => commands::service::run(cmd, global),
        Commands::Category(cmd) => commands::category::run(cmd, global),
        Commands::Settings(cmd) => commands::settings::run(cmd, global),
        Commands::Stats(args) => commands::stats::run(args, global),
        Commands::Bom(args) => commands::bom::run(args, global),
        Commands::Installments(args) => commands::installments::run(args, global),
        Commands::Proposal(cmd) => commands::proposal::run(cmd, global),
        Commands::Reset(args) => commands::reset::run(args),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
