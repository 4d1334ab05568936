//! Request definitions for the operations exposed on [`Client`](crate::Client).
//!
//! They can also be sent directly with [`Client::send`](crate::Client::send).

use crate::models::{Organization, Plan, Subscription, User};
use crate::request::{Request, RequestData};
use reqwest::Method;
use serde::Serialize;
use std::borrow::Cow;

/// `GET /organizations`
pub struct GetOrganizations;

impl Request for GetOrganizations {
    type Data = ();
    type Response = Vec<Organization>;

    fn endpoint(&self) -> Cow<str> {
        "organizations".into()
    }
}

/// `GET /organizations/{id}`
pub struct FindOrganizationById {
    pub id: i32,
}

impl Request for FindOrganizationById {
    type Data = ();
    type Response = Organization;

    fn endpoint(&self) -> Cow<str> {
        format!("organizations/{}", self.id).into()
    }
}

/// `POST /organizations`
pub struct PostOrganization<'a> {
    pub organization: &'a Organization,
}

impl Request for PostOrganization<'_> {
    type Data = Organization;
    type Response = Organization;
    const METHOD: Method = Method::POST;
    const IDEMPOTENT: bool = false;

    fn endpoint(&self) -> Cow<str> {
        "organizations".into()
    }

    fn data(&self) -> RequestData<&Organization> {
        RequestData::Json(self.organization)
    }
}

/// `GET /subscriptions`, optionally limited to `limit` results.
#[derive(Serialize)]
pub struct GetSubscriptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

impl Request for GetSubscriptions {
    type Data = Self;
    type Response = Vec<Subscription>;

    fn endpoint(&self) -> Cow<str> {
        "subscriptions".into()
    }

    fn data(&self) -> RequestData<&Self> {
        match self.limit {
            Some(_) => RequestData::Query(self),
            None => RequestData::Empty,
        }
    }
}

/// `PUT /organizations/{orgId}/subscriptions/{subId}`
///
/// The whole subscription is sent, so repeating the call is harmless.
pub struct PutSubscription<'a> {
    pub organization_id: i32,
    pub subscription_id: i32,
    pub subscription: &'a Subscription,
}

impl<'a> PutSubscription<'a> {
    /// Build the request from the identifiers carried by `subscription` itself.
    pub fn for_subscription(subscription: &'a Subscription) -> crate::Result<Self> {
        Ok(Self {
            organization_id: subscription
                .organization_id
                .ok_or(crate::Error::MissingParameter("organizationId"))?,
            subscription_id: subscription
                .id
                .ok_or(crate::Error::MissingParameter("id"))?,
            subscription,
        })
    }
}

impl Request for PutSubscription<'_> {
    type Data = Subscription;
    type Response = Subscription;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<str> {
        format!(
            "organizations/{}/subscriptions/{}",
            self.organization_id, self.subscription_id
        )
        .into()
    }

    fn data(&self) -> RequestData<&Subscription> {
        RequestData::Json(self.subscription)
    }
}

/// `GET /plans/{id}`. The API serves plans without authentication.
pub struct GetPlan {
    pub id: i32,
}

impl Request for GetPlan {
    type Data = ();
    type Response = Plan;
    const AUTHENTICATED: bool = false;

    fn endpoint(&self) -> Cow<str> {
        format!("plans/{}", self.id).into()
    }
}

/// `GET /organizations/{id}/users`
pub struct GetUsersByOrganization {
    pub id: i32,
}

impl Request for GetUsersByOrganization {
    type Data = ();
    type Response = Vec<User>;

    fn endpoint(&self) -> Cow<str> {
        format!("organizations/{}/users", self.id).into()
    }
}
