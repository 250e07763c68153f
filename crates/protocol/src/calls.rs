//! Constructors for the `RE.*` calls the host issues
//!
//! One function per entry point of the editing script. Getters return a
//! value; everything else is evaluated for its effect.

use crate::ScriptCall;

// Queue
pub fn get_command_queue() -> ScriptCall {
    ScriptCall::new("getCommandQueue")
}

// Getters
pub fn get_html() -> ScriptCall {
    ScriptCall::new("getHtml")
}

pub fn get_text() -> ScriptCall {
    ScriptCall::new("getText")
}

pub fn get_selected_href() -> ScriptCall {
    ScriptCall::new("getSelectedHref")
}

pub fn range_selection_exists() -> ScriptCall {
    ScriptCall::new("rangeSelectionExists")
}

pub fn range_or_caret_selection_exists() -> ScriptCall {
    ScriptCall::new("rangeOrCaretSelectionExists")
}

pub fn is_content_editable() -> ScriptCall {
    ScriptCall::new("isContentEditable")
}

pub fn get_line_height() -> ScriptCall {
    ScriptCall::new("getLineHeight")
}

/// Canonical height query; the editor element's client height in px
pub fn get_client_height() -> ScriptCall {
    ScriptCall::new("getClientHeight")
}

/// Caret offset from the top of the visible area; negative when above it
pub fn get_relative_caret_y_position() -> ScriptCall {
    ScriptCall::new("getRelativeCaretYPosition")
}

// State setters
pub fn set_html(html: &str) -> ScriptCall {
    ScriptCall::new("setHtml").arg(html)
}

pub fn set_placeholder_text(text: &str) -> ScriptCall {
    ScriptCall::new("setPlaceholderText").arg(text)
}

pub fn set_line_height(px: i64) -> ScriptCall {
    ScriptCall::new("setLineHeight").arg(format!("{px}px"))
}

pub fn set_content_editable(editable: bool) -> ScriptCall {
    ScriptCall::new("setContentEditable").arg(editable)
}

// Formatting
pub fn set_font_size(px: i64) -> ScriptCall {
    ScriptCall::new("setFontSize").arg(format!("{px}px"))
}

pub fn set_editor_background_color(hex: &str) -> ScriptCall {
    ScriptCall::new("setEditorBackgroundColor").arg(hex)
}

pub fn set_text_color(hex: &str) -> ScriptCall {
    ScriptCall::new("setTextColor").arg(hex)
}

pub fn set_text_background_color(hex: &str) -> ScriptCall {
    ScriptCall::new("setTextBackgroundColor").arg(hex)
}

pub fn set_heading(level: u8) -> ScriptCall {
    ScriptCall::new("setHeading").arg(level.to_string())
}

pub fn insert_image(url: &str, alt: &str, width: i64, height: i64) -> ScriptCall {
    ScriptCall::new("insertImage")
        .arg(url)
        .arg(alt)
        .arg(width)
        .arg(height)
}

pub fn insert_link(href: &str, title: &str) -> ScriptCall {
    ScriptCall::new("insertLink").arg(href).arg(title)
}

pub fn focus_at_point(x: f64, y: f64) -> ScriptCall {
    ScriptCall::new("focusAtPoint").arg(x).arg(y)
}

/// Zero-argument editing verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditVerb {
    Bold,
    Italic,
    Subscript,
    Superscript,
    Strikethrough,
    Underline,
    Indent,
    Outdent,
    OrderedList,
    UnorderedList,
    Blockquote,
    AlignLeft,
    AlignCenter,
    AlignRight,
    RemoveFormat,
    Undo,
    Redo,
    Focus,
    Blur,
    PrepareInsert,
}

impl EditVerb {
    pub const fn method(self) -> &'static str {
        match self {
            Self::Bold => "setBold",
            Self::Italic => "setItalic",
            Self::Subscript => "setSubscript",
            Self::Superscript => "setSuperscript",
            Self::Strikethrough => "setStrikeThrough",
            Self::Underline => "setUnderline",
            Self::Indent => "setIndent",
            Self::Outdent => "setOutdent",
            Self::OrderedList => "setOrderedList",
            Self::UnorderedList => "setUnorderedList",
            Self::Blockquote => "setBlockquote",
            Self::AlignLeft => "setJustifyLeft",
            Self::AlignCenter => "setJustifyCenter",
            Self::AlignRight => "setJustifyRight",
            Self::RemoveFormat => "removeFormat",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Focus => "focus",
            Self::Blur => "blurFocus",
            Self::PrepareInsert => "prepareInsert",
        }
    }

    pub fn call(self) -> ScriptCall {
        ScriptCall::new(self.method())
    }
}
