//! Client side of TextSnap: takes images from the file picker, drag-and-drop,
//! or the clipboard, validates them, sends them to the OCR gateway, and keeps
//! the session state a UI renders.

pub mod candidate;
pub mod controller;
pub mod http_transport;
pub mod intake;
pub mod messages;
pub mod mime_detect;
pub mod notification;
pub mod session;
pub mod transport;
pub mod validation;

pub use candidate::{ImageCandidate, ImageOrigin};
pub use controller::{
    ControllerEvent, ControllerSettings, ResponseDisposition, SessionController, SessionEvent,
    SubmitOutcome,
};
pub use http_transport::HttpTransport;
pub use intake::{ClipboardItem, ClipboardPayload, DropPayload, DroppedFile};
pub use notification::{Notification, NotificationId, Severity};
pub use session::{ActiveImage, ImageId, SessionState};
pub use transport::{ExtractionRequest, ExtractionResult, ExtractionTransport, FailureKind, RequestId};
pub use validation::{ValidationError, ValidationPolicy, ALLOWED_EXTENSIONS};
