//! Fixture artifacts for tests and demos.
//!
//! Three tiers: a polished site that should clear the Excellent bar, a
//! template-fresh site full of fixable defects, and a nearly-excellent site
//! whose only gaps are missing contact info and a missing meta description
//! (the canonical improvement scenario).

use crate::artifact::{AssetKind, AssetOrigin, AssetRef, BusinessProfile, Page, WebsiteArtifact};

const BAKERY_STYLESHEET: &str = r#"
body { font-family: 'Inter', sans-serif; color: #222222; background: #ffffff; }
h1, h2 { font-family: 'Libre Baskerville', serif; color: #5a3d1e; }
.cta { background: #c97b2d; color: #ffffff; }
footer { background: #f5e9dc; }
"#;

const TEMPLATE_STYLESHEET: &str = r#"
body { font-family: Arial, sans-serif; color: #eeeeee; background: #ffffff; }
"#;

pub fn bakery_profile() -> BusinessProfile {
    BusinessProfile {
        name: "Cedar Bakery".to_string(),
        industry: "bakery".to_string(),
        tagline: Some("Bread worth waking up for".to_string()),
        phone: Some("612-555-0148".to_string()),
        email: Some("hello@cedarbakery.com".to_string()),
        address: Some("3524 15th Ave S, Minneapolis".to_string()),
        testimonials: vec![
            "The sourdough is the best in the Twin Cities.".to_string(),
            "Warm, welcoming, and always fresh.".to_string(),
        ],
    }
}

fn generated_image(url: &str, alt: &str) -> AssetRef {
    AssetRef {
        url: url.to_string(),
        kind: AssetKind::Image,
        alt_text: Some(alt.to_string()),
        origin: AssetOrigin::Generated,
    }
}

fn stock_image(url: &str) -> AssetRef {
    AssetRef {
        url: url.to_string(),
        kind: AssetKind::Image,
        alt_text: None,
        origin: AssetOrigin::StockTemplate,
    }
}

fn polished_home_markup() -> String {
    r#"<nav><a href="/about">About</a> <a href="/contact">Contact</a></nav>
<h1>Cedar Bakery</h1>
<p>Bread worth waking up for. Every loaf at Cedar Bakery is shaped by hand,
proofed overnight, and baked fresh before the neighborhood wakes up. You can
smell the warm crust from the corner of 15th Avenue, and we love that you can.</p>
<h2>What comes out of our ovens</h2>
<p>Naturally leavened sourdough, seeded rye, brioche that melts, and morning
buns your weekend deserves. We mill heritage grains from Minnesota farms we
know by name, because your bread should taste like somewhere, not anywhere.</p>
<h2>Neighbors say it best</h2>
<blockquote>"The sourdough is the best in the Twin Cities." — a five-star review</blockquote>
<blockquote>"Warm, welcoming, and always fresh."</blockquote>
<p><a class="cta" href="/contact">Order now</a> for weekend pickup, or just
come in and enjoy the smell. We bake in small batches and sell out most days,
so your favorite loaf appreciates an early start.</p>
<img src="/img/hero-loaves.jpg" alt="Sourdough loaves cooling on a rack">"#
        .to_string()
}

fn polished_about_markup() -> String {
    r#"<nav><a href="/">Home</a> <a href="/contact">Contact</a></nav>
<h1>About Cedar Bakery</h1>
<p>Cedar Bakery started in a home kitchen with one dutch oven and a starter
named Gus. Ten years later we still feed Gus every morning, and he still does
the heavy lifting. You get the same slow fermentation, the same care, and the
same crackle when the crust gives way.</p>
<h2>Our bakers</h2>
<p>Three of us shape every loaf. We trained in Minneapolis kitchens and
learned the rest from the dough. We believe good bread is patient work: long
ferments, honest flour, and warm hands. It is simple, and simple is hard to
fake.</p>
<h2>Our promise</h2>
<p>If a loaf ever disappoints you, tell us and the next one is on the house.
That has cost us exactly four loaves in ten years, and we are proud of every
one of them.</p>"#
        .to_string()
}

fn polished_contact_markup() -> String {
    r#"<nav><a href="/">Home</a> <a href="/about">About</a></nav>
<h1>Visit Cedar Bakery</h1>
<p>Find us at 3524 15th Ave S, Minneapolis — two blocks from Powderhorn Park.
We open at seven and bake until the shelves are empty. Come early for the
morning buns; they are the first thing you will smell and the first thing to
go.</p>
<h2>Get in touch</h2>
<p>Call us at 612-555-0148 or write to hello@cedarbakery.com for wholesale,
weddings, or a standing weekend order. You can also <a class="cta"
href="mailto:hello@cedarbakery.com">request a quote</a> for events — we love
feeding a crowd and we answer every message the same day.</p>
<h2>Hours</h2>
<p>Wednesday through Sunday, 7am until sold out. Follow the smell of warm
bread and fresh coffee; when the ovens rest, so do we.</p>"#
        .to_string()
}

/// A finished, well-generated site: clears every rubric and should land at
/// Excellent or above with no open critical issues.
pub fn polished_site() -> WebsiteArtifact {
    WebsiteArtifact::new(
        bakery_profile(),
        vec![
            Page {
                slug: "index".to_string(),
                title: "Cedar Bakery — Fresh Sourdough in Minneapolis".to_string(),
                markup: polished_home_markup(),
                stylesheet: BAKERY_STYLESHEET.to_string(),
                meta_description: Some(
                    "Cedar Bakery bakes naturally leavened sourdough and pastries fresh every \
                     morning in Minneapolis. Order ahead or visit us near Powderhorn Park."
                        .to_string(),
                ),
                assets: vec![generated_image(
                    "/img/hero-loaves.jpg",
                    "Sourdough loaves cooling on a rack",
                )],
            },
            Page {
                slug: "about".to_string(),
                title: "About Cedar Bakery — Ten Years of Slow Bread".to_string(),
                markup: polished_about_markup(),
                stylesheet: BAKERY_STYLESHEET.to_string(),
                meta_description: Some(
                    "Meet the three bakers behind Cedar Bakery and the decade-old starter that \
                     leavens every loaf we sell in Minneapolis."
                        .to_string(),
                ),
                assets: vec![generated_image(
                    "/img/bakers.jpg",
                    "Bakers shaping dough at dawn",
                )],
            },
            Page {
                slug: "contact".to_string(),
                title: "Visit Cedar Bakery — Hours and Orders".to_string(),
                markup: polished_contact_markup(),
                stylesheet: BAKERY_STYLESHEET.to_string(),
                meta_description: Some(
                    "Cedar Bakery is open Wednesday through Sunday at 3524 15th Ave S, \
                     Minneapolis. Call 612-555-0148 or email us for orders and events."
                        .to_string(),
                ),
                assets: vec![generated_image(
                    "/img/storefront.jpg",
                    "Cedar Bakery storefront on 15th Avenue",
                )],
            },
        ],
    )
}

/// A site the template pipeline produced but nobody customized: filler copy,
/// stock imagery, no navigation, no contact details, no metadata. Nearly
/// every evaluator should object.
pub fn template_fresh_site() -> WebsiteArtifact {
    let mut profile = bakery_profile();
    profile.tagline = None;
    WebsiteArtifact::new(
        profile,
        vec![
            Page {
                slug: "index".to_string(),
                title: "Home".to_string(),
                markup: r#"<h3>Welcome to our website</h3>
<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit. Your company
description goes here.</p>
<img src="/tpl/stock-1.jpg">"#
                    .to_string(),
                stylesheet: TEMPLATE_STYLESHEET.to_string(),
                meta_description: None,
                assets: vec![stock_image("/tpl/stock-1.jpg"), stock_image("/tpl/stock-2.jpg")],
            },
            Page {
                slug: "Second Page".to_string(),
                title: "Home".to_string(),
                markup: r#"<h3>Welcome to our website</h3>
<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit. Your company
description goes here.</p>"#
                    .to_string(),
                stylesheet: TEMPLATE_STYLESHEET.to_string(),
                meta_description: None,
                assets: vec![stock_image("/tpl/stock-3.jpg")],
            },
        ],
    )
}

/// Polished everywhere except two gaps: no contact details appear in any
/// page copy, and the home page has no meta description. The business
/// profile still carries phone and email, so the contact fixer has its
/// upstream data.
pub fn nearly_excellent_site() -> WebsiteArtifact {
    let mut artifact = polished_site();
    artifact.pages.retain(|p| p.slug != "contact");

    let home = artifact.page_mut("index").expect("fixture has a home page");
    home.meta_description = None;
    home.markup = home
        .markup
        .replace(r#"<a href="/contact">Contact</a>"#, "");

    let about = artifact.page_mut("about").expect("fixture has an about page");
    about.markup = about
        .markup
        .replace(r#"<a href="/contact">Contact</a>"#, "");

    artifact
}
