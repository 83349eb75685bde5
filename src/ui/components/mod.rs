mod column_filter;
mod command_input;
mod input;
mod key_result;
mod picker;
mod search_input;

pub use column_filter::{ColumnFilter, ColumnFilterEvent};
pub use command_input::{CommandEvent, CommandInput};
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use picker::{Picker, PickerEvent, PickerItem};
pub use search_input::{SearchEvent, SearchInput};
