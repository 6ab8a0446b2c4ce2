use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;
use steexp_explorer::{short_key, AccountSections, AccountView, Screen};
use steexp_horizon::{OperationSummary, TransactionSummary};
use steexp_types::FetchError;

use crate::feeds::{FeedList, FeedLists, FeedPage};
use crate::{InputMode, TuiState};

pub(crate) fn draw_ui(
    frame: &mut Frame<'_>,
    horizon_url: &str,
    screen: &Screen,
    feeds: Option<&FeedLists>,
    state: &TuiState,
) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Steexp ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" horizon={}", horizon_url)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, vertical[0]);

    match screen {
        Screen::Blank => render_message(
            frame,
            vertical[1],
            "Account",
            "Press / and enter an account id to look it up".to_string(),
            Color::Gray,
        ),
        Screen::Loading { account_id } => render_message(
            frame,
            vertical[1],
            "Account",
            format!("Loading {} ...", account_id),
            Color::Yellow,
        ),
        Screen::Error { account_id, error } => render_error(frame, vertical[1], account_id, error),
        Screen::Account(view) => render_account(frame, vertical[1], view, feeds),
    }

    let footer_text = match state.mode {
        InputMode::Editing => format!("account id: {}_   (Enter look up | Esc cancel)", state.input),
        InputMode::Normal => format!(
            "/ look up | R reload | [ ] operations page | {{ }} transactions page | Q quit   {}",
            state.status_line
        ),
    };
    let footer = Paragraph::new(footer_text)
        .block(Block::default().borders(Borders::ALL).title("Hotkeys"));
    frame.render_widget(footer, vertical[2]);
}

fn render_message(frame: &mut Frame<'_>, area: Rect, title: &str, text: String, color: Color) {
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(paragraph, area);
}

fn render_error(frame: &mut Frame<'_>, area: Rect, account_id: &str, error: &FetchError) {
    let hint = match error {
        FetchError::NotFound { .. } => "Press / to look up another account",
        FetchError::Transport { .. } => "Press R to retry",
        FetchError::MalformedResponse { .. } => "The server returned data that could not be shown",
    };
    let text = vec![
        Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(hint),
    ];
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(format!("Account {}", account_id)));
    frame.render_widget(paragraph, area);
}

fn render_account(frame: &mut Frame<'_>, area: Rect, view: &AccountView, feeds: Option<&FeedLists>) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(4),
            Constraint::Length(8),
            Constraint::Length(6),
        ])
        .split(columns[0]);

    render_identity(frame, left[0], view);
    render_balances(frame, left[1], &view.sections);
    render_signing(frame, left[2], &view.sections);
    render_flags(frame, left[3], &view.sections);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);

    match feeds {
        Some(lists) => {
            render_feed(frame, right[0], "Operations", &lists.operations, operation_line);
            render_feed(frame, right[1], "Transactions", &lists.transactions, transaction_line);
        }
        None => {
            render_message(frame, right[0], "Operations", "Loading ...".to_string(), Color::Yellow);
            render_message(frame, right[1], "Transactions", "Loading ...".to_string(), Color::Yellow);
        }
    }
}

fn render_identity(frame: &mut Frame<'_>, area: Rect, view: &AccountView) {
    let identity = &view.sections.identity;
    let mut lines = vec![Line::from(Span::styled(
        identity.label.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if identity.label != identity.account_id {
        lines.push(Line::from(identity.account_id.clone()));
    }
    if let Some(domain) = identity.anchor.as_ref().and_then(|a| a.domain.as_deref()) {
        lines.push(Line::from(format!("anchor: {}", domain)));
    }
    if let Some(url) = view.json_url.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("json: {}", url),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Account"));
    frame.render_widget(paragraph, area);
}

fn render_balances(frame: &mut Frame<'_>, area: Rect, sections: &AccountSections) {
    let items: Vec<ListItem<'_>> = sections
        .balances
        .iter()
        .map(|row| {
            let mut line = format!("{:<12} {:>22}", row.asset, row.balance);
            if let Some(issuer) = row.issuer.as_deref() {
                line.push_str(&format!("  {}", short_key(issuer)));
            }
            if let Some(limit) = row.limit.as_deref() {
                line.push_str(&format!("  limit={}", limit));
            }
            ListItem::new(line)
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Balances"));
    frame.render_widget(list, area);
}

fn render_signing(frame: &mut Frame<'_>, area: Rect, sections: &AccountSections) {
    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let signers: Vec<ListItem<'_>> = sections
        .signing
        .iter()
        .map(|row| ListItem::new(format!("{} w={} {}", short_key(&row.public_key), row.weight, row.signer_type)))
        .collect();
    frame.render_widget(
        List::new(signers).block(Block::default().borders(Borders::ALL).title("Signers")),
        split[0],
    );

    let thresholds = &sections.thresholds;
    let text = format!(
        "low: {}\nmedium: {}\nhigh: {}",
        thresholds.low, thresholds.medium, thresholds.high
    );
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Thresholds")),
        split[1],
    );
}

fn render_flags(frame: &mut Frame<'_>, area: Rect, sections: &AccountSections) {
    let items: Vec<ListItem<'_>> = sections
        .flags
        .iter()
        .map(|row| ListItem::new(format!("{}: {}", row.name, row.value)))
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Flags"));
    frame.render_widget(list, area);
}

fn render_feed<T>(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    list: &FeedList<T>,
    line: fn(&T) -> String,
) {
    let title = format!("{} (page {})", title, list.page_number());
    match &list.page {
        FeedPage::Loading => render_message(frame, area, &title, "Loading ...".to_string(), Color::Yellow),
        FeedPage::Failed(err) => render_message(frame, area, &title, err.to_string(), Color::Red),
        FeedPage::Loaded(page) if page.records.is_empty() => {
            render_message(frame, area, &title, "Nothing here yet".to_string(), Color::Gray)
        }
        FeedPage::Loaded(page) => {
            let items: Vec<ListItem<'_>> = page.records.iter().map(|r| ListItem::new(line(r))).collect();
            frame.render_widget(
                List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
                area,
            );
        }
    }
}

fn operation_line(op: &OperationSummary) -> String {
    format!(
        "{} | {} | {}",
        op.created_at.format("%Y-%m-%d %H:%M"),
        op.operation_type,
        short_key(&op.transaction_hash)
    )
}

fn transaction_line(tx: &TransactionSummary) -> String {
    format!(
        "{} | {} ops | {}{}",
        tx.created_at.format("%Y-%m-%d %H:%M"),
        tx.operation_count,
        short_key(&tx.hash),
        if tx.successful { "" } else { " | failed" }
    )
}
