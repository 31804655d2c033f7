//! Style sheets and style element ids installed by the services.

/// Code block container layout.
pub const CODE_BLOCK_STYLE_ID: &str = "code-block-styles";

/// Message animation, typing indicator and timestamps.
pub const MESSAGE_STYLE_ID: &str = "message-enhancement-styles";

/// Font scaling driven by `--font-size-factor`.
pub const FONT_SIZE_STYLE_ID: &str = "font-size-styles";

/// Preferences header button.
pub const PREFERENCES_BUTTON_STYLE_ID: &str = "preferences-button-styles";

pub const CODE_BLOCK_CSS: &str = "\
.code-block { position: relative; margin: 1rem 0; border-radius: 6px; overflow: hidden; }
.code-header { display: flex; justify-content: space-between; align-items: center; padding: 0.5rem 1rem; background-color: rgba(0, 0, 0, 0.1); font-family: monospace; font-size: 0.8rem; }
.code-language { text-transform: uppercase; font-weight: bold; }
.copy-code-button { background: transparent; border: 1px solid rgba(0, 0, 0, 0.1); border-radius: 4px; padding: 2px 8px; font-size: 0.7rem; cursor: pointer; transition: all 0.2s ease; }
.copy-code-button:hover { background-color: rgba(0, 0, 0, 0.1); }
.copy-code-button.copied { background-color: #4caf50; color: white; border-color: #4caf50; }
.code-block pre { margin: 0; padding: 1rem; overflow-x: auto; }
.code-block code { font-family: 'Courier New', Courier, monospace; font-size: 0.9rem; line-height: 1.5; }
";

pub const MESSAGE_CSS: &str = "\
.message-animation { animation: message-appear 0.3s ease-out; }
@keyframes message-appear { from { opacity: 0; transform: translateY(10px); } to { opacity: 1; transform: translateY(0); } }
.typing-indicator-container { margin-bottom: 10px; }
.typing-indicator { display: flex; align-items: center; padding: 10px 15px; border-radius: 18px; width: fit-content; }
.typing-indicator span { height: 8px; width: 8px; background-color: var(--typing-indicator-bg, #e0e0e0); border-radius: 50%; display: inline-block; margin-right: 5px; animation: typing 1.4s infinite ease-in-out; }
.typing-indicator span:nth-child(2) { animation-delay: 0.2s; }
.typing-indicator span:nth-child(3) { animation-delay: 0.4s; margin-right: 0; }
@keyframes typing { 0%, 60%, 100% { transform: translateY(0); opacity: 0.6; } 30% { transform: translateY(-5px); opacity: 1; } }
.message-timestamp { font-size: 0.7rem; color: var(--timestamp-color, #999); margin-top: 4px; text-align: right; }
";

pub const FONT_SIZE_CSS: &str = "\
:root { --font-size-factor: 1; }
body { font-size: calc(16px * var(--font-size-factor)); }
.message { font-size: calc(1rem * var(--font-size-factor)); }
button { font-size: calc(1rem * var(--font-size-factor)); }
.message-timestamp { font-size: calc(0.7rem * var(--font-size-factor)); }
pre code { font-size: calc(0.9rem * var(--font-size-factor)); }
";

pub const PREFERENCES_BUTTON_CSS: &str = "\
.preferences-button { background: transparent; border: none; font-size: 1.2rem; cursor: pointer; width: 40px; height: 40px; border-radius: 50%; }
.preferences-button:hover { background-color: rgba(255, 255, 255, 0.2); }
";
