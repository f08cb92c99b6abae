pub mod api;

pub use api::{
    AnalyticsData, CourseSummary, CoursesData, CreateOrderRequest, ErrorBody, LayoutData,
    NotificationData, NotificationsData, OrderData, ProfileData, RegisterRequest, Success,
};
