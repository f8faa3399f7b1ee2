//! Entity Browser - 터미널 Hub 엔티티 탐색기
//!
//! `EntityBrowser` 구현. 부모/자식 관계를 따라 내려가며 엔티티 하나를
//! 고릅니다.
//!
//! - ↑↓ (j/k): 이동
//! - Enter / →: 하위로
//! - Backspace / ←: 상위로
//! - a / Space: 선택 (허용된 엔티티만)
//! - Esc / q: 취소

use super::theme::Theme;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mayaconnect_core::{EntityBrowser, PATH_SEPARATOR};
use mayaconnect_foundation::{Entity, HubSession, Result};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::sync::Arc;

/// 키 입력 결과
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserAction {
    None,
    Accept(Entity),
    Cancel,
}

// ============================================================================
// BrowserState
// ============================================================================

/// 탐색 상태 (터미널과 무관)
pub struct BrowserState {
    session: Arc<dyn HubSession>,
    /// 현재 위치 (루트부터)
    path: Vec<Entity>,
    /// 현재 위치의 자식들
    items: Vec<Entity>,
    list_state: ListState,
    status: Option<String>,
}

impl BrowserState {
    pub fn new(session: Arc<dyn HubSession>) -> Self {
        let mut state = Self {
            session,
            path: Vec::new(),
            items: Vec::new(),
            list_state: ListState::default(),
            status: None,
        };
        state.reload();
        state
    }

    /// 위치 설정 (찾을 수 없는 id는 건너뜀)
    pub fn set_location(&mut self, location: &[String]) {
        self.path = location
            .iter()
            .filter_map(|id| self.session.find(id).ok().flatten())
            .collect();
        self.reload();
    }

    fn reload(&mut self) {
        let parent = self.path.last().map(|e| e.id.as_str());
        match self.session.children(parent) {
            Ok(mut children) => {
                children.sort_by(|a, b| a.display_name().cmp(b.display_name()));
                self.items = children;
                self.status = None;
            }
            Err(e) => {
                self.items.clear();
                self.status = Some(e.to_string());
            }
        }
        self.list_state
            .select(if self.items.is_empty() { None } else { Some(0) });
    }

    pub fn highlighted(&self) -> Option<&Entity> {
        self.list_state.selected().and_then(|i| self.items.get(i))
    }

    /// 위치 표시 문자열
    pub fn location_text(&self) -> String {
        if self.path.is_empty() {
            return "(root)".to_string();
        }
        self.path
            .iter()
            .map(|e| e.display_name())
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR)
    }

    fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    fn select_previous(&mut self) {
        if let Some(i) = self.list_state.selected() {
            self.list_state.select(Some(i.saturating_sub(1)));
        }
    }

    fn descend(&mut self) {
        if let Some(entity) = self.highlighted().cloned() {
            self.path.push(entity);
            self.reload();
        }
    }

    fn ascend(&mut self) {
        let Some(left) = self.path.pop() else {
            return;
        };
        self.reload();
        // 나온 엔티티에 커서 유지
        if let Some(index) = self.items.iter().position(|e| e.id == left.id) {
            self.list_state.select(Some(index));
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyCode, can_accept: &dyn Fn(&[Entity]) -> bool) -> BrowserAction {
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => self.descend(),
            KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => self.ascend(),
            KeyCode::Char('a') | KeyCode::Char(' ') => {
                if let Some(entity) = self.highlighted().cloned() {
                    if can_accept(std::slice::from_ref(&entity)) {
                        return BrowserAction::Accept(entity);
                    }
                    self.status = Some(format!(
                        "{} ({}) cannot be selected",
                        entity.display_name(),
                        entity.entity_type
                    ));
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => return BrowserAction::Cancel,
            _ => {}
        }
        BrowserAction::None
    }

    /// Render the browser
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        can_accept: &dyn Fn(&[Entity]) -> bool,
    ) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Location
                Constraint::Min(3),    // Entities
                Constraint::Length(3), // Footer/help
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("Location: ", theme.dim()),
            Span::styled(self.location_text(), theme.location()),
        ]))
        .block(
            Block::default()
                .title(" Select Context ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_style(theme.focused_frame()),
        );
        frame.render_widget(header, layout[0]);

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|entity| {
                let allowed = can_accept(std::slice::from_ref(entity));
                let (marker, marker_style) = if allowed {
                    ("● ", theme.acceptable())
                } else {
                    ("  ", theme.dim())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, marker_style),
                    Span::styled(entity.display_name().to_string(), theme.entry()),
                    Span::styled(format!("  [{}]", entity.entity_type), theme.dim()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.frame()),
            )
            .highlight_style(theme.cursor());
        frame.render_stateful_widget(list, layout[1], &mut self.list_state);

        let footer = match &self.status {
            Some(status) => Paragraph::new(status.as_str()).style(theme.rejected()),
            None => Paragraph::new("↑↓: Navigate  Enter: Open  ←: Up  a: Select  Esc: Cancel")
                .style(theme.dim()),
        };
        frame.render_widget(
            footer
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(theme.frame()),
                )
                .alignment(Alignment::Center),
            layout[2],
        );
    }
}

// ============================================================================
// TerminalEntityBrowser
// ============================================================================

/// crossterm 기반 모달 브라우저
pub struct TerminalEntityBrowser {
    state: BrowserState,
    theme: Theme,
    selected: Vec<Entity>,
}

impl TerminalEntityBrowser {
    pub fn new(session: Arc<dyn HubSession>) -> Self {
        Self {
            state: BrowserState::new(session),
            theme: Theme::default(),
            selected: Vec::new(),
        }
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        can_accept: &dyn Fn(&[Entity]) -> bool,
    ) -> Result<bool> {
        loop {
            terminal.draw(|frame| {
                let area = frame.area();
                self.state.render(frame, area, &self.theme, can_accept);
            })?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(false);
            }

            match self.state.handle_key(key.code, can_accept) {
                BrowserAction::Accept(entity) => {
                    self.selected = vec![entity];
                    return Ok(true);
                }
                BrowserAction::Cancel => return Ok(false),
                BrowserAction::None => {}
            }
        }
    }
}

impl EntityBrowser for TerminalEntityBrowser {
    fn set_location(&mut self, location: Vec<String>) {
        self.state.set_location(&location);
    }

    fn exec(&mut self, can_accept: &dyn Fn(&[Entity]) -> bool) -> Result<bool> {
        self.selected.clear();

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let outcome = self.event_loop(&mut terminal, can_accept);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        outcome
    }

    fn selected(&self) -> Vec<Entity> {
        self.selected.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mayaconnect_core::MemorySession;
    use ratatui::backend::TestBackend;

    fn session() -> Arc<dyn HubSession> {
        Arc::new(MemorySession::new("alice").with_entities(vec![
            Entity::new("p1", "Project").name("show"),
            Entity::new("q1", "Sequence").name("sq01").parent("p1"),
            Entity::new("s1", "Shot").name("sh010").parent("q1"),
            Entity::new("s2", "Shot").name("sh020").parent("q1"),
            Entity::new("t1", "Task").name("anim").parent("s1"),
        ]))
    }

    fn only_shots(selection: &[Entity]) -> bool {
        matches!(selection, [e] if e.entity_type == "Shot")
    }

    #[test]
    fn test_starts_at_root() {
        let state = BrowserState::new(session());
        assert_eq!(state.location_text(), "(root)");
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.highlighted().map(|e| e.id.as_str()), Some("p1"));
    }

    #[test]
    fn test_set_location_lists_children() {
        let mut state = BrowserState::new(session());
        state.set_location(&["p1".to_string(), "q1".to_string(), "ghost".to_string()]);

        assert_eq!(state.location_text(), "show / sq01");
        let ids: Vec<&str> = state.items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
    }

    #[test]
    fn test_navigation_and_accept() {
        let mut state = BrowserState::new(session());

        assert_eq!(state.handle_key(KeyCode::Enter, &only_shots), BrowserAction::None);
        assert_eq!(state.handle_key(KeyCode::Enter, &only_shots), BrowserAction::None);
        assert_eq!(state.location_text(), "show / sq01");

        state.handle_key(KeyCode::Down, &only_shots);
        match state.handle_key(KeyCode::Char('a'), &only_shots) {
            BrowserAction::Accept(entity) => assert_eq!(entity.id, "s2"),
            other => panic!("expected accept, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_selection_sets_status() {
        let mut state = BrowserState::new(session());

        assert_eq!(state.handle_key(KeyCode::Char('a'), &only_shots), BrowserAction::None);
        assert!(state.status.as_deref().unwrap().contains("cannot be selected"));
    }

    #[test]
    fn test_ascend_keeps_cursor_on_previous_entity() {
        let mut state = BrowserState::new(session());
        state.set_location(&["p1".to_string(), "q1".to_string()]);
        state.handle_key(KeyCode::Down, &only_shots);
        state.handle_key(KeyCode::Enter, &only_shots);
        assert_eq!(state.location_text(), "show / sq01 / sh020");

        state.handle_key(KeyCode::Backspace, &only_shots);
        assert_eq!(state.highlighted().map(|e| e.id.as_str()), Some("s2"));
        assert_eq!(state.handle_key(KeyCode::Esc, &only_shots), BrowserAction::Cancel);
    }

    #[test]
    fn test_render_shows_location_and_entities() {
        let mut state = BrowserState::new(session());
        state.set_location(&["p1".to_string(), "q1".to_string()]);

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                state.render(frame, area, &Theme::dark(), &only_shots);
            })
            .unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("show / sq01"));
        assert!(screen.contains("sh010"));
        assert!(screen.contains("[Shot]"));
    }
}
