//! 엔티티 브라우저 스타일
//!
//! 색은 역할(위치, 항목, 수락 가능 표시, 상태줄)별로 하나씩만 둡니다.

use ratatui::style::{Color, Modifier, Style};

/// 브라우저 팔레트
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub entry: Color,
    /// 엔티티 타입, 힌트 같은 보조 텍스트
    pub dim: Color,
    /// 현재 위치와 포커스된 프레임
    pub location: Color,
    /// 수락 가능한 엔티티 표시
    pub acceptable: Color,
    /// 수락 불가 메시지
    pub rejected: Color,
    pub frame: Color,
    pub cursor: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            entry: Color::Gray,
            dim: Color::DarkGray,
            location: Color::Cyan,
            acceptable: Color::Green,
            rejected: Color::LightRed,
            frame: Color::DarkGray,
            cursor: Color::Blue,
        }
    }

    pub fn entry(&self) -> Style {
        Style::default().fg(self.entry)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn location(&self) -> Style {
        Style::default()
            .fg(self.location)
            .add_modifier(Modifier::BOLD)
    }

    pub fn focused_frame(&self) -> Style {
        Style::default().fg(self.location)
    }

    pub fn frame(&self) -> Style {
        Style::default().fg(self.frame)
    }

    /// 커서가 놓인 행
    pub fn cursor(&self) -> Style {
        Style::default()
            .bg(self.cursor)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn acceptable(&self) -> Style {
        Style::default().fg(self.acceptable)
    }

    pub fn rejected(&self) -> Style {
        Style::default().fg(self.rejected)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
