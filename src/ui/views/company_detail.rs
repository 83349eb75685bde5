use crate::api::types::{Company, Namespace};
use crate::api::CachedBackofficeClient;
use crate::query::Query;
use crate::table::{format_currency, format_detail, format_percent};
use crate::ui::view::{base_shortcuts, ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use serde_json::{Map, Value};

const LABEL_WIDTH: usize = 30;

/// Financial fields, formatted as euros when numeric.
const FINANCIALS: &[(&str, &str)] = &[
  ("annualRevenue", "Annual revenue"),
  ("annualRevenueDisplay", "Revenue (as reported)"),
  ("ebitdaValue", "EBITDA"),
  ("debtValue", "Debt"),
  ("annualRevenue2024", "Revenue 2024"),
  ("annualRevenue2023", "Revenue 2023"),
  ("annualRevenue2022", "Revenue 2022"),
  ("annualRevenue2021", "Revenue 2021"),
  ("ebitdaValue2023", "EBITDA 2023"),
  ("debtValue2023", "Debt 2023"),
  ("acquisitionProbability", "Acquisition probability"),
];

const PROFILE: &[(&str, &str)] = &[
  ("mainSector", "Main sector"),
  ("subSector", "Sub-sector"),
  ("city", "City"),
  ("department", "Department"),
  ("region", "Region"),
  ("employees", "Employees"),
  ("employeeCount", "Headcount"),
  ("seniorityYears", "Seniority (years)"),
  ("companyAgeYears", "Company age (years)"),
  ("description", "Description"),
  ("acquisitionPotential", "Acquisition potential"),
];

const SIGNALS: &[(&str, &str)] = &[
  ("successionOrTransmissionSignals", "Succession / transmission"),
  ("carveOutPossible", "Carve-out possible"),
  ("recentShareholderChanges", "Recent shareholder changes"),
  ("structuringRecruitment", "Structuring recruitment"),
  ("repositioningOrPivot", "Repositioning / pivot"),
  ("isInCollectiveProcedure", "Collective procedure"),
];

const OPPORTUNITIES: &str = "opportunities";
const RISKS: &str = "risks";

/// A titled block of label/value rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
  pub title: &'static str,
  pub rows: Vec<(String, String)>,
}

impl Section {
  fn new(title: &'static str) -> Self {
    Self {
      title,
      rows: Vec::new(),
    }
  }

  fn push(&mut self, label: impl Into<String>, value: String) {
    self.rows.push((label.into(), value));
  }
}

fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
  fields.get(key).filter(|v| !v.is_null())
}

fn format_financial(key: &str, value: &Value) -> String {
  match value.as_f64() {
    Some(ratio) if key == "acquisitionProbability" => format_percent(ratio),
    Some(amount) if key != "annualRevenueDisplay" => format_currency(amount),
    _ => format_detail(Some(value)),
  }
}

fn string_items(value: Option<&Value>) -> Vec<String> {
  match value {
    Some(Value::Array(items)) => items
      .iter()
      .map(|item| match item {
        Value::String(s) => s.clone(),
        other => format_detail(Some(other)),
      })
      .collect(),
    _ => Vec::new(),
  }
}

/// Break a record into display sections.
///
/// Registry data is listed whole. The analysis namespace is split into
/// themed sections, and whatever they do not cover lands in "All data".
/// Empty sections are dropped.
pub fn detail_sections(company: &Company) -> Vec<Section> {
  let mut sections = Vec::new();

  let mut general = Section::new("General");
  if let Some(id) = company.id() {
    general.push("ID", id.to_string());
  }
  if let Some(name) = company.name() {
    general.push("Name", name.to_string());
  }
  if let Some(tag) = company.short_tag() {
    general.push("Short tag", tag.to_string());
  }
  if let Some(logo) = company.logo_url() {
    general.push("Logo", logo.to_string());
  }
  sections.push(general);

  if let Some(registry) = company.namespace(Namespace::Registry) {
    let mut section = Section::new("Registry data");
    for (key, value) in registry {
      section.push(key.as_str(), format_detail(Some(value)));
    }
    sections.push(section);
  }

  if let Some(analysis) = company.namespace(Namespace::Analysis) {
    let mut financials = Section::new("Financials");
    for (key, label) in FINANCIALS {
      if let Some(value) = present(analysis, key) {
        financials.push(*label, format_financial(key, value));
      }
    }
    sections.push(financials);

    let mut profile = Section::new("Company profile");
    for (key, label) in PROFILE {
      if let Some(value) = present(analysis, key) {
        profile.push(*label, format_detail(Some(value)));
      }
    }
    sections.push(profile);

    let mut outlook = Section::new("Opportunities & risks");
    for item in string_items(present(analysis, OPPORTUNITIES)) {
      outlook.push("+ Opportunity", item);
    }
    for item in string_items(present(analysis, RISKS)) {
      outlook.push("- Risk", item);
    }
    sections.push(outlook);

    let mut signals = Section::new("Signals");
    for (key, label) in SIGNALS {
      if let Some(value) = present(analysis, key) {
        signals.push(*label, format_detail(Some(value)));
      }
    }
    sections.push(signals);

    let shown = |key: &str| {
      FINANCIALS
        .iter()
        .chain(PROFILE)
        .chain(SIGNALS)
        .any(|(k, _)| *k == key)
        || key == OPPORTUNITIES
        || key == RISKS
    };
    let mut rest = Section::new("All data");
    for (key, value) in analysis {
      if !shown(key) {
        rest.push(key.as_str(), format_detail(Some(value)));
      }
    }
    sections.push(rest);
  }

  sections.retain(|section| !section.rows.is_empty());
  sections
}

/// Every field of a single company, fetched by id.
pub struct CompanyDetailView {
  id: i64,
  query: Query<Company>,
  sections: Vec<Section>,
  scroll: u16,
}

impl CompanyDetailView {
  pub fn new(id: i64, client: CachedBackofficeClient) -> Self {
    let mut query = Query::new(move || {
      let client = client.clone();
      async move { client.get_company(id).await }
    });
    query.start();

    Self {
      id,
      query,
      sections: Vec::new(),
      scroll: 0,
    }
  }

  fn lines(&self) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for section in &self.sections {
      if !lines.is_empty() {
        lines.push(Line::default());
      }
      lines.push(Line::styled(
        section.title,
        Style::default().fg(Color::Yellow).bold(),
      ));
      for (label, value) in &section.rows {
        let mut value_lines = value.lines();
        let first = value_lines.next().unwrap_or_default();
        lines.push(Line::from(vec![
          Span::styled(
            format!("  {:<width$}", label, width = LABEL_WIDTH),
            Style::default().fg(Color::Cyan),
          ),
          Span::raw(first.to_string()),
        ]));
        // Pretty-printed objects continue under the value column
        for more in value_lines {
          lines.push(Line::raw(format!("  {:<width$}{}", "", more, width = LABEL_WIDTH)));
        }
      }
    }
    lines
  }

  fn title(&self) -> String {
    let name = self
      .query
      .data()
      .and_then(Company::name)
      .map(str::to_string)
      .unwrap_or_else(|| format!("Company {}", self.id));
    if self.query.is_loading() {
      format!(" {} (loading...) ", name)
    } else {
      format!(" {} ", name)
    }
  }
}

impl View for CompanyDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::PageDown => self.scroll = self.scroll.saturating_add(20),
      KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(20),
      KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
      KeyCode::Char('r') => self.query.reload(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = match self.query.error() {
      Some(e) => Paragraph::new(format!("Failed to load company: {}", e))
        .style(Style::default().fg(Color::Red)),
      None if self.sections.is_empty() && self.query.is_loading() => {
        Paragraph::new("Loading company...").style(Style::default().fg(Color::DarkGray))
      }
      None => Paragraph::new(self.lines()).scroll((self.scroll, 0)),
    };

    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);
  }

  fn breadcrumb_label(&self) -> String {
    self
      .query
      .data()
      .and_then(Company::short_tag)
      .map(str::to_string)
      .unwrap_or_else(|| format!("#{}", self.id))
  }

  fn tick(&mut self) {
    if self.query.poll() {
      if let Some(company) = self.query.data() {
        self.sections = detail_sections(company);
      }
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = base_shortcuts();
    shortcuts.push(ShortcutInfo::new("j/k", "scroll").with_priority(40));
    shortcuts.push(ShortcutInfo::new("r", "reload").with_priority(100));
    shortcuts
  }
}
