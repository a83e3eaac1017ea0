pub mod config;
pub mod lexer;
pub mod report;
pub mod scanner;
pub mod span;

pub use config::{ScanConfig, UnbalancedPolicy};
pub use lexer::token::{Token, TokenKind};
pub use lexer::tokenize;
pub use report::FileReport;
pub use scanner::{
    ClassScanner, DirectoryScanner, FileScanError, FileScanner, Lookup, MemberScanner,
    NameInformation, ParameterScanner, ScanError, ScanResult, TokenArrayScanner,
};
pub use span::{LineRange, Span, TokenRange};
