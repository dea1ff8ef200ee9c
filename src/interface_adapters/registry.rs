// Static role -> resource mapping consumed by the external CRUD admin
// framework. Pure data; the framework renders the actual screens.

use crate::domain::entities::Role;

/// Named icon glyphs; the view layer maps them to its icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceIcon {
    Dashboard,
    Event,
    Password,
    Storefront,
    Chart,
    Person,
    Feedback,
    Payment,
    BookOnline,
    Chat,
}

/// Screens the admin framework should wire for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceScreens {
    pub list: bool,
    pub edit: bool,
    pub create: bool,
    pub show: bool,
}

const LIST: ResourceScreens = ResourceScreens {
    list: true,
    edit: false,
    create: false,
    show: false,
};
const LIST_EDIT: ResourceScreens = ResourceScreens {
    list: true,
    edit: true,
    create: false,
    show: false,
};
const LIST_SHOW: ResourceScreens = ResourceScreens {
    list: true,
    edit: false,
    create: false,
    show: true,
};
const FULL_CRUD: ResourceScreens = ResourceScreens {
    list: true,
    edit: true,
    create: true,
    show: true,
};
const LIST_EDIT_CREATE: ResourceScreens = ResourceScreens {
    list: true,
    edit: true,
    create: true,
    show: false,
};
const EDIT_ONLY: ResourceScreens = ResourceScreens {
    list: false,
    edit: true,
    create: false,
    show: false,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub name: &'static str,
    pub label: &'static str,
    pub icon: ResourceIcon,
    pub screens: ResourceScreens,
}

static ADMIN_RESOURCES: [Resource; 7] = [
    Resource {
        name: "dashboard",
        label: "Dashboard",
        icon: ResourceIcon::Dashboard,
        screens: LIST,
    },
    Resource {
        name: "event-planners",
        label: "Event Planners",
        icon: ResourceIcon::Event,
        screens: FULL_CRUD,
    },
    Resource {
        name: "vendors",
        label: "Vendors",
        icon: ResourceIcon::Storefront,
        screens: FULL_CRUD,
    },
    Resource {
        name: "users",
        label: "Users",
        icon: ResourceIcon::Person,
        screens: LIST_EDIT_CREATE,
    },
    Resource {
        name: "feedback",
        label: "Feedback",
        icon: ResourceIcon::Feedback,
        screens: LIST,
    },
    Resource {
        name: "payments",
        label: "Payments",
        icon: ResourceIcon::Payment,
        screens: LIST,
    },
    Resource {
        name: "account",
        label: "Change Password",
        icon: ResourceIcon::Password,
        screens: EDIT_ONLY,
    },
];

static EVENT_PLANNER_RESOURCES: [Resource; 6] = [
    Resource {
        name: "dashboard",
        label: "Dashboard",
        icon: ResourceIcon::Chart,
        screens: LIST,
    },
    Resource {
        name: "vendors",
        label: "Vendors",
        icon: ResourceIcon::Storefront,
        screens: LIST,
    },
    Resource {
        name: "users",
        label: "Users",
        icon: ResourceIcon::Person,
        screens: LIST,
    },
    Resource {
        name: "feedback",
        label: "Feedback",
        icon: ResourceIcon::Feedback,
        screens: LIST,
    },
    Resource {
        name: "payments",
        label: "Payments",
        icon: ResourceIcon::Payment,
        screens: LIST,
    },
    Resource {
        name: "account",
        label: "Change Password",
        icon: ResourceIcon::Password,
        screens: EDIT_ONLY,
    },
];

static VENDOR_RESOURCES: [Resource; 6] = [
    Resource {
        name: "dashboard",
        label: "Dashboard",
        icon: ResourceIcon::Dashboard,
        screens: LIST,
    },
    Resource {
        name: "services",
        label: "Manage Services",
        icon: ResourceIcon::Event,
        screens: LIST_EDIT_CREATE,
    },
    Resource {
        name: "bookings",
        label: "Bookings",
        icon: ResourceIcon::BookOnline,
        screens: LIST_SHOW,
    },
    Resource {
        name: "chat",
        label: "Messages",
        icon: ResourceIcon::Chat,
        screens: LIST_SHOW,
    },
    Resource {
        name: "payments",
        label: "Payments",
        icon: ResourceIcon::Payment,
        screens: LIST,
    },
    Resource {
        name: "account",
        label: "Account Settings",
        icon: ResourceIcon::Password,
        screens: EDIT_ONLY,
    },
];

static CLIENT_RESOURCES: [Resource; 6] = [
    Resource {
        name: "dashboard",
        label: "Dashboard",
        icon: ResourceIcon::Dashboard,
        screens: LIST,
    },
    Resource {
        name: "services",
        label: "Browse Services",
        icon: ResourceIcon::Event,
        screens: LIST,
    },
    Resource {
        name: "my-bookings",
        label: "My Bookings",
        icon: ResourceIcon::BookOnline,
        screens: LIST_SHOW,
    },
    Resource {
        name: "payments",
        label: "Payments",
        icon: ResourceIcon::Payment,
        screens: LIST,
    },
    Resource {
        name: "chat",
        label: "Messages",
        icon: ResourceIcon::Chat,
        screens: LIST_SHOW,
    },
    Resource {
        name: "account",
        label: "Account Settings",
        icon: ResourceIcon::Password,
        screens: EDIT_ONLY,
    },
];

/// Resource set handed to the admin framework at session load time.
pub fn resources_for(role: Role) -> &'static [Resource] {
    match role {
        Role::Admin => &ADMIN_RESOURCES,
        Role::EventPlanner => &EVENT_PLANNER_RESOURCES,
        Role::Vendor => &VENDOR_RESOURCES,
        Role::Client => &CLIENT_RESOURCES,
    }
}
