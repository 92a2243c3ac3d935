//! Proposal document rendering
//!
//! Renderers only format numbers that were already computed; the
//! installment table comes from [`crate::engine::installments`].

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;
use thiserror::Error;

use crate::engine::installments::simulate;
use crate::engine::stats::ProjectStats;
use crate::entities::card_rate::CardRateTier;
use crate::entities::cost::AdditionalServiceLine;
use crate::entities::proposal::{ClientInfo, SavedProposal};
use crate::entities::settings::Settings;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const PROPOSAL_TEMPLATE: &str = "proposal.md.tera";

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    #[diagnostic(code(jqt::render::not_found))]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    #[diagnostic(code(jqt::render::failed))]
    Render(String),
}

/// Everything a rendered proposal may show
#[derive(Debug, Clone)]
pub struct DocumentContext<'a> {
    pub number: String,
    pub created: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    /// Quoted price; the anchor for the installment table
    pub price: f64,
    pub currency: &'a str,
    pub stats: &'a ProjectStats,
    pub settings: &'a Settings,
    pub card_rates: &'a [CardRateTier],
    pub client: &'a ClientInfo,
    pub services: &'a [AdditionalServiceLine],
}

impl<'a> DocumentContext<'a> {
    /// Context for a saved proposal, using its own frozen card table when present
    pub fn for_proposal(
        proposal: &'a SavedProposal,
        fallback_rates: &'a [CardRateTier],
        currency: &'a str,
    ) -> Self {
        Self {
            number: proposal.number(),
            created: proposal.created,
            valid_until: proposal.valid_until(),
            price: proposal.final_price,
            currency,
            stats: &proposal.stats,
            settings: &proposal.data.settings,
            card_rates: proposal
                .data
                .card_rates
                .as_deref()
                .unwrap_or(fallback_rates),
            client: &proposal.client,
            services: &proposal.data.services,
        }
    }
}

/// Turns a document context into a finished document
pub trait DocumentRenderer {
    /// File extension of the output, without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, ctx: &DocumentContext<'_>) -> Result<String, RenderError>;
}

#[derive(Serialize)]
struct ServiceView {
    description: String,
    value: String,
}

#[derive(Serialize)]
struct InstallmentView {
    installments: u32,
    total: String,
    installment_value: String,
}

/// Markdown renderer backed by the embedded tera template
pub struct MarkdownRenderer {
    tera: Tera,
}

impl MarkdownRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                let template_str = std::str::from_utf8(&content.data)
                    .map_err(|e| RenderError::Render(e.to_string()))?;
                tera.add_raw_template(filename, template_str)
                    .map_err(|e| RenderError::Render(e.to_string()))?;
            }
        }

        if !tera.get_template_names().any(|n| n == PROPOSAL_TEMPLATE) {
            return Err(RenderError::NotFound(PROPOSAL_TEMPLATE.to_string()));
        }
        Ok(Self { tera })
    }
}

impl DocumentRenderer for MarkdownRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, ctx: &DocumentContext<'_>) -> Result<String, RenderError> {
        let money = |v: f64| format!("{} {:.2}", ctx.currency, v);
        let table = simulate(ctx.price, ctx.card_rates);

        let services: Vec<ServiceView> = ctx
            .services
            .iter()
            .map(|s| ServiceView {
                description: s.description.clone(),
                value: money(s.value),
            })
            .collect();
        let installments: Vec<InstallmentView> = table
            .rows
            .iter()
            .map(|r| InstallmentView {
                installments: r.installments,
                total: money(r.total),
                installment_value: money(r.installment_value),
            })
            .collect();

        let company = &ctx.settings.company;
        let company_name = if company.name.is_empty() {
            "Quote"
        } else {
            company.name.as_str()
        };

        let mut context = tera::Context::new();
        context.insert("company_name", company_name);
        context.insert("company", company);
        context.insert("client", ctx.client);
        context.insert("number", &ctx.number);
        context.insert("created", &ctx.created.format("%Y-%m-%d").to_string());
        context.insert("valid_until", &ctx.valid_until.format("%Y-%m-%d").to_string());
        context.insert("price", &money(ctx.price));
        context.insert("cash_price", &money(table.cash_price));
        context.insert("installments", &installments);
        context.insert("services", &services);
        context.insert("margin", &ctx.stats.realized_margin);

        self.tera
            .render(PROPOSAL_TEMPLATE, &context)
            .map_err(|e| RenderError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::snapshot::capture;
    use crate::entities::proposal::ProposalData;

    fn proposal() -> SavedProposal {
        let mut data = ProposalData::default();
        data.settings.company.name = "Oak & Iron".to_string();
        data.services.push(AdditionalServiceLine::new("Installation", 150.0));
        data.card_rates = Some(vec![
            CardRateTier::new(1, 3.5),
            CardRateTier::new(12, 14.0),
        ]);
        let stats = ProjectStats {
            sales_price: 1000.0,
            ..Default::default()
        };
        let mut client = ClientInfo::new("Ana", "Kitchen");
        client.delivery_time = Some("30 days".to_string());
        capture(data, stats, client, 3, "test", Utc::now())
    }

    #[test]
    fn test_markdown_contains_price_and_installments() {
        let p = proposal();
        let ctx = DocumentContext::for_proposal(&p, &[], "R$");
        let doc = MarkdownRenderer::new().unwrap().render(&ctx).unwrap();

        assert!(doc.contains("# Oak & Iron"));
        assert!(doc.contains(&format!("Proposal {}", p.number())));
        assert!(doc.contains("**R$ 1000.00**"));
        assert!(doc.contains("| 12x | R$ 1000.00 | R$ 83.33 |"));
        assert!(doc.contains("Cash price: R$ 860.00"));
        assert!(doc.contains("- Installation: R$ 150.00"));
        assert!(doc.contains("- Delivery: 30 days"));
    }

    #[test]
    fn test_overridden_price_drives_document() {
        let mut p = proposal();
        p.final_price = 2000.0;
        let ctx = DocumentContext::for_proposal(&p, &[], "R$");
        let doc = MarkdownRenderer::new().unwrap().render(&ctx).unwrap();
        assert!(doc.contains("**R$ 2000.00**"));
    }

    #[test]
    fn test_fallback_card_rates_used_when_proposal_has_none() {
        let mut p = proposal();
        p.data.card_rates = None;
        let rates = vec![CardRateTier::new(12, 14.0)];
        let ctx = DocumentContext::for_proposal(&p, &rates, "$");
        assert_eq!(ctx.card_rates.len(), 1);
    }
}
