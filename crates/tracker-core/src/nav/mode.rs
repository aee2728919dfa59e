/// Which screen has the keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Start,
    LinkInput,
    CatalogList,
    GroupTable,
    DetailTable,
    /// A table with the player panel over it. Entered once a session has
    /// started; the inner view says which table is underneath.
    Player(TableView),
}

impl Mode {
    /// The table this mode shows, if any.
    pub fn table_view(self) -> Option<TableView> {
        match self {
            Mode::GroupTable | Mode::Player(TableView::Group) => Some(TableView::Group),
            Mode::DetailTable | Mode::Player(TableView::Detail) => Some(TableView::Detail),
            Mode::Start | Mode::LinkInput | Mode::CatalogList => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableView {
    Group,
    Detail,
}

/// Start-screen choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartChoice {
    #[default]
    AddLink,
    Browse,
}

impl StartChoice {
    pub fn toggle(self) -> Self {
        match self {
            StartChoice::AddLink => StartChoice::Browse,
            StartChoice::Browse => StartChoice::AddLink,
        }
    }
}

/// Table or control cluster, switched with tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Table,
    Controls,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Table => Focus::Controls,
            Focus::Controls => Focus::Table,
        }
    }
}

/// Buttons of the transport control cluster, left to right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControlButton {
    Prev,
    #[default]
    PlayPause,
    Skip,
}

impl ControlButton {
    pub const ALL: [ControlButton; 3] = [
        ControlButton::Prev,
        ControlButton::PlayPause,
        ControlButton::Skip,
    ];

    pub fn left(self) -> Self {
        match self {
            ControlButton::Skip => ControlButton::PlayPause,
            _ => ControlButton::Prev,
        }
    }

    pub fn right(self) -> Self {
        match self {
            ControlButton::Prev => ControlButton::PlayPause,
            _ => ControlButton::Skip,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlButton::Prev => "<< prev",
            ControlButton::PlayPause => "play/pause",
            ControlButton::Skip => "skip >>",
        }
    }
}
