#[cfg(test)]
pub const SITE_CONFIG: &str = r##"
[site]
name = "Acme Plumbing"
url = "https://acme-plumbing.example"
description = "Friendly plumbers since 1998"
author = "Acme team"
email = "hello@acme-plumbing.example"
phone = "+1 555 0100"
address = "12 Water Lane, Springfield"
founded = 1998-04-01

[[site.socials]]
name = "Mastodon"
url = "https://social.example/@acme"

[seo]
title_template = "{title} | {site}"
default_image = "/images/og.png"
twitter_handle = "@acme"

[paths]
content_dir = "content/blog"
pages_dir = "pages"
template_dir = "template"
public_dir = "public"
output_dir = "dist"

[[nav]]
label = "Home"
href = "/"

[[nav]]
label = "Services"

[[nav.children]]
label = "Repairs"
href = "/repairs/"

[[nav.children]]
label = "Installations"
href = "/installations/"

[[nav]]
label = "Blog"
href = "/blog/"

[build]
page_size = 2
home_post_count = 2

[theme]
dark_mode = true

[cms]
backend = "github"
repo = "acme/site"
"##;

#[cfg(test)]
pub const POST_DATA_TOML: &str = r##"+++
title = "What to expect on a first visit"
date = 2024-02-03
description = "A walk through our visit checklist."
tags = ["customers", "checklist"]
hero_image = "/images/van.jpg"
+++

We start every job with a short walk through the house.

<!-- more -->

Then we agree on a fixed price before any work starts.
"##;

#[cfg(test)]
pub const POST_DATA_HEADER: &str = r##"<!--
[DATE]: # (2024-01-15 09:30:00.000)
[AUTHOR]: # (Dana)
[TAGS]: # (winter maintenance)
[HERO_IMAGE]: # (frozen.jpg)
[DRAFT]: # (false)
-->

# Keeping pipes safe in winter

Cold snaps are hard on plumbing.

![A frozen pipe](frozen.jpg)

<!-- more -->

## Insulate

| Pipe | Sleeve |
|------|--------|
| Copper | Foam |
"##;

#[cfg(test)]
pub const POST_BODY_MD: &str = r##"Cold snaps are hard on plumbing.

![A frozen pipe](frozen.jpg)

<!-- more -->

## Insulate

| Pipe | Sleeve |
|------|--------|
| Copper | Foam |
"##;

#[cfg(test)]
pub const POST_DATA_HTML: &str = r##"<!--
[DATE]: # (2024-03-01 08:00:00)
[TAGS]: # (news)
-->
<h1>New opening hours</h1>
<p>From March we open at 7am.</p>
<!-- more -->
<p>Weekend calls are still answered.</p>
"##;
