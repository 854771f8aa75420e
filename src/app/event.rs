/// Application events
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AppEvent {
    Generate(String),
    LoadFile(String),
    LoadClipboard,
    SetWordsPerMinute(u32),
    SetNumberOfWords(u32),
    ShowHistory,
    ReadHistory(u64),
    DeleteHistory(u64),
    ClearHistory,
    Quit,
    Help,
    InvalidCommand(String),
    None,
}
