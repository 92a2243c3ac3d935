//! `jqt proposal` command - Saved proposals

use chrono::Utc;
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use crate::cli::commands::installments::print_installments;
use crate::cli::helpers::{confirm, format_short_id, num, open_store, print_done, truncate_str};
use crate::cli::output::{effective_format, print_json, print_list, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::Config;
use crate::engine::installments::simulate;
use crate::engine::snapshot::{
    apply_override, capture, edit_client, next_sequence, set_status, ClientPatch,
    FinancialOverride,
};
use crate::entities::proposal::{ClientInfo, SavedProposal};
use crate::render::{DocumentContext, DocumentRenderer, MarkdownRenderer};

#[derive(Subcommand, Debug)]
pub enum ProposalCommands {
    /// Freeze the current project into a numbered proposal
    Save(SaveArgs),

    /// List saved proposals
    List,

    /// Show one proposal
    Show(ShowArgs),

    /// Replace the current project with a proposal's contents
    Load(LoadArgs),

    /// Change a proposal's status
    Status(StatusArgs),

    /// Edit client details on a proposal
    Edit(EditArgs),

    /// Overwrite material cost, fabrication cost or price
    Override(OverrideArgs),

    /// Delete a proposal
    Rm(RmArgs),

    /// Render a proposal document
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
pub struct SaveArgs {
    /// Client name
    #[arg(long, short = 'c')]
    pub client: String,

    /// Project name
    #[arg(long, short = 'p', default_value = "")]
    pub project: String,

    #[arg(long)]
    pub phone: Option<String>,

    /// Description of the work offered
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Days the price stays valid (default from config)
    #[arg(long)]
    pub validity: Option<u32>,

    #[arg(long)]
    pub warranty: Option<String>,

    #[arg(long)]
    pub delivery: Option<String>,

    #[arg(long)]
    pub payment: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Proposal ID, short ID (PROP@N) or number (0001-2026)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct LoadArgs {
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    pub id: String,

    /// awaiting_approval, in_progress, sent, completed
    pub status: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    pub id: String,

    #[arg(long, short = 'c')]
    pub client: Option<String>,

    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Phone number ("" clears)
    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long)]
    pub validity: Option<u32>,

    #[arg(long)]
    pub warranty: Option<String>,

    #[arg(long)]
    pub delivery: Option<String>,

    #[arg(long)]
    pub payment: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct OverrideArgs {
    pub id: String,

    #[arg(long)]
    pub material: Option<f64>,

    #[arg(long)]
    pub fabrication: Option<f64>,

    #[arg(long)]
    pub price: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    pub id: String,

    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    pub id: String,

    /// Output file (default: <number>.md in the project root)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Print to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Tabled, Serialize)]
struct ProposalRow {
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "PROJECT")]
    project: String,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "CREATED")]
    created: String,
}

pub fn run(cmd: ProposalCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProposalCommands::Save(args) => run_save(args),
        ProposalCommands::List => run_list(global),
        ProposalCommands::Show(args) => run_show(args, global),
        ProposalCommands::Load(args) => run_load(args),
        ProposalCommands::Status(args) => run_status(args),
        ProposalCommands::Edit(args) => run_edit(args),
        ProposalCommands::Override(args) => run_override(args),
        ProposalCommands::Rm(args) => run_rm(args),
        ProposalCommands::Render(args) => run_render(args),
    }
}

fn run_save(args: SaveArgs) -> Result<()> {
    let (project, store) = open_store()?;
    let config = Config::load();
    let stats = store.compute()?.stats;
    let existing = project.load_proposals()?;

    let mut client = ClientInfo::new(args.client, args.project);
    client.phone = args.phone;
    client.service_description = args.description;
    client.validity_days = args.validity.unwrap_or(config.default_validity_days);
    client.warranty = args.warranty;
    client.delivery_time = args.delivery;
    client.payment_condition = args.payment;

    let proposal = capture(
        store.proposal_data(),
        stats,
        client,
        next_sequence(&existing),
        config.author(),
        Utc::now(),
    );
    project.save_proposal(&proposal)?;

    print_done("Saved", "proposal", &proposal.number(), &proposal.client.client_name);
    println!(
        "   {} {}",
        style("Price:").dim(),
        style(config.money(proposal.final_price)).green()
    );
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let project = Project::discover()?;
    let proposals = project.load_proposals()?;
    let rows: Vec<ProposalRow> = proposals
        .iter()
        .map(|p| ProposalRow {
            number: p.number(),
            id: format_short_id(&p.id),
            client: truncate_str(&p.client.client_name, 24),
            project: truncate_str(&p.client.project_name, 24),
            price: num(p.final_price),
            status: p.status.to_string(),
            created: p.created.format("%Y-%m-%d").to_string(),
        })
        .collect();
    let ids: Vec<String> = proposals.iter().map(|p| p.id.to_string()).collect();
    print_list(&proposals, &rows, &ids, global.output, "proposals")
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover()?;
    let proposal = project.find_proposal(&args.id)?;

    match effective_format(global.output, false) {
        OutputFormat::Json => print_json(&proposal),
        OutputFormat::Id => {
            println!("{}", proposal.id);
            Ok(())
        }
        OutputFormat::Table => print_summary(&proposal, &Config::load()),
        _ => print_yaml(&proposal),
    }
}

fn print_summary(p: &SavedProposal, config: &Config) -> Result<()> {
    let line = |label: &str, value: String| println!("  {:<20} {}", style(label).dim(), value);

    println!("{} {}", style("Proposal").bold(), style(p.number()).cyan());
    line("ID", p.id.to_string());
    line("Status", p.status.to_string());
    line("Client", p.client.client_name.clone());
    line("Project", p.client.project_name.clone());
    if let Some(phone) = &p.client.phone {
        line("Phone", phone.clone());
    }
    line("Created", p.created.format("%Y-%m-%d").to_string());
    line("Valid until", p.valid_until().format("%Y-%m-%d").to_string());
    line("Author", p.author.clone());
    println!();
    line("Material cost", config.money(p.material_cost()));
    line("Fabrication cost", config.money(p.fabrication_cost()));
    line("Price", config.money(p.final_price));
    line("Realized margin", format!("{}%", num(p.stats.realized_margin)));
    println!();

    let rates = p.data.card_rates.as_deref().unwrap_or(&[]);
    print_installments(&simulate(p.final_price, rates), OutputFormat::Table, config)
}

fn run_load(args: LoadArgs) -> Result<()> {
    let (project, mut store) = open_store()?;
    let proposal = project.find_proposal(&args.id)?;

    let prompt = format!(
        "Replace the current project with proposal {}?",
        proposal.number()
    );
    if !confirm(&prompt, args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }

    store.restore(&proposal.data);
    project.save_store(&store)?;
    print_done("Loaded", "proposal", &proposal.number(), &proposal.client.project_name);
    Ok(())
}

fn run_status(args: StatusArgs) -> Result<()> {
    let project = Project::discover()?;
    let mut proposal = project.find_proposal(&args.id)?;
    let status = set_status(&mut proposal, &args.status)?;
    project.save_proposal(&proposal)?;
    print_done("Updated", "proposal", &proposal.number(), &status.to_string());
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover()?;
    let mut proposal = project.find_proposal(&args.id)?;

    let patch = ClientPatch {
        client_name: args.client,
        project_name: args.project,
        phone: args.phone,
        service_description: args.description,
        validity_days: args.validity,
        warranty: args.warranty,
        delivery_time: args.delivery,
        payment_condition: args.payment,
    };
    edit_client(&mut proposal, patch);
    project.save_proposal(&proposal)?;
    print_done("Updated", "proposal", &proposal.number(), &proposal.client.client_name);
    Ok(())
}

fn run_override(args: OverrideArgs) -> Result<()> {
    let ov = FinancialOverride {
        material_cost: args.material,
        fabrication_cost: args.fabrication,
        final_price: args.price,
    };
    if ov.is_empty() {
        return Err(miette::miette!(
            "Nothing to override; pass --material, --fabrication or --price"
        ));
    }

    let project = Project::discover()?;
    let mut proposal = project.find_proposal(&args.id)?;
    apply_override(&mut proposal, &ov)?;
    project.save_proposal(&proposal)?;

    let config = Config::load();
    print_done("Updated", "proposal", &proposal.number(), "");
    println!(
        "   {} {}  {} {}%",
        style("Price:").dim(),
        config.money(proposal.final_price),
        style("Margin:").dim(),
        num(proposal.stats.realized_margin)
    );
    Ok(())
}

fn run_rm(args: RmArgs) -> Result<()> {
    let project = Project::discover()?;
    let proposal = project.find_proposal(&args.id)?;
    if !confirm(&format!("Delete proposal {}?", proposal.number()), args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    project.remove_proposal(&proposal.id)?;
    print_done("Removed", "proposal", &proposal.number(), &proposal.client.client_name);
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<()> {
    let (project, store) = open_store()?;
    let proposal = project.find_proposal(&args.id)?;
    let config = Config::load();

    let renderer = MarkdownRenderer::new()?;
    let ctx = DocumentContext::for_proposal(&proposal, store.card_rates(), &config.currency);
    let document = renderer.render(&ctx)?;

    if args.stdout {
        print!("{}", document);
        return Ok(());
    }

    let path = args.file.unwrap_or_else(|| {
        project
            .root()
            .join(format!("{}.{}", proposal.number(), renderer.extension()))
    });
    std::fs::write(&path, document).into_diagnostic()?;
    println!(
        "{} Rendered proposal {} to {}",
        style("✓").green(),
        style(proposal.number()).cyan(),
        style(path.display()).yellow()
    );
    Ok(())
}
